use zettel_core::{
    increment_segment, next_identifier, next_level_seed, parse_identifier, Identifier,
    IdentifierError, NoteRecord, Segment,
};

/// Walks the allocator down a few levels, collecting every identifier.
fn allocated_outline() -> Vec<Identifier> {
    let mut allocated = Vec::new();
    let mut frontier = vec![Identifier::root()];
    for _ in 0..4 {
        let mut next_frontier = Vec::new();
        for parent in &frontier {
            for _ in 0..3 {
                let child = next_identifier(parent, &allocated).unwrap();
                allocated.push(child.clone());
                next_frontier.push(child);
            }
        }
        frontier = next_frontier;
    }
    allocated
}

#[test]
fn rendered_identifiers_parse_back_to_the_same_segments() {
    for identifier in allocated_outline() {
        let rendered = identifier.to_string();
        assert_eq!(parse_identifier(&rendered).unwrap(), identifier);
    }
}

#[test]
fn parents_sort_before_their_descendants() {
    let outline = allocated_outline();
    for parent in &outline {
        for child in outline.iter().filter(|candidate| {
            candidate.depth() > parent.depth() && candidate.starts_with(parent)
        }) {
            assert!(parent < child, "{parent} should sort before {child}");
        }
    }
}

#[test]
fn allocation_is_monotonic_among_siblings() {
    let outline = allocated_outline();
    let top_level: Vec<String> = outline
        .iter()
        .filter(|identifier| identifier.depth() == 1)
        .map(ToString::to_string)
        .collect();
    assert_eq!(top_level, ["1", "2", "3"]);

    let under_one: Vec<String> = outline
        .iter()
        .filter(|identifier| identifier.depth() == 2)
        .map(ToString::to_string)
        .collect();
    // Depth is shared across parents, so later parents continue the run.
    assert_eq!(under_one[..3], ["1a", "1b", "1c"]);
}

#[test]
fn letter_runs_grow_instead_of_carrying() {
    let mut segment = Segment::Letters("x".to_string());
    let mut seen = Vec::new();
    for _ in 0..5 {
        segment = increment_segment(&segment).unwrap();
        seen.push(segment.to_string());
    }
    assert_eq!(seen, ["y", "z", "za", "zb", "zc"]);
}

#[test]
fn seeds_alternate_between_numbers_and_letters() {
    let deep = parse_identifier("4c2").unwrap();
    assert_eq!(next_level_seed(&deep), Segment::Letters("a".to_string()));
    assert_eq!(
        next_identifier(&deep, &[deep.clone()]).unwrap().to_string(),
        "4c2a"
    );
}

#[test]
fn malformed_identifiers_are_reported() {
    assert_eq!(
        parse_identifier("x1"),
        Err(IdentifierError::Malformed("x1".to_string()))
    );
    assert!(NoteRecord::from_keyed_name("06-20", "notes-index.md").is_err());
}

#[test]
fn note_record_serializes_identifier_as_string() {
    let record = NoteRecord::from_keyed_name("P1", "12a1-TAG1-TAG2-a-short-topic.md").unwrap();
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["key"], "P1");
    assert_eq!(json["identifier"], "12a1");
    assert_eq!(json["tags"], "TAG1 TAG2");
    assert_eq!(json["description"], "a short topic");

    let decoded: NoteRecord = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, record);
}
