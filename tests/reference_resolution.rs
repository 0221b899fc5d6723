//! Destinations, pointers and the uncited-marker post-pass.

use lexner::grouping::GroupingEngine;
use lexner::reference::ReferenceResolver;
use lexner::{NamedEntityType, Segment};

fn resolve_and_group(segments: &[Segment]) -> lexner::GroupedEntities {
    let mut resolver = ReferenceResolver::default();
    let entities = resolver.resolve(segments);
    GroupingEngine::default().group(entities, segments)
}

#[test]
fn quoted_citation_of_numbered_title() {
    let segments = vec![
        Segment::new("4. Results Interpretation", "Title"),
        Segment::from_text(r#"This expands on "Results Interpretation" from Document 1."#),
    ];
    let grouped = resolve_and_group(&segments);

    let pointers: Vec<_> = grouped
        .entities
        .iter()
        .filter(|e| e.entity_type == NamedEntityType::ReferencePointer)
        .collect();
    assert_eq!(pointers.len(), 1);
    assert_eq!(pointers[0].text, "\"Results Interpretation\"");
    assert_eq!((pointers[0].character_start, pointers[0].character_end), (16, 40));
    assert_eq!(pointers[0].group_name, "4. Results Interpretation");

    let marker = grouped
        .group_by_name(NamedEntityType::Reference, "4. Results Interpretation")
        .expect("cited marker survives");
    assert_eq!(marker.segment, Some(0));
    assert_eq!(marker.top_relevance_entity.relevance_percentage, 100);
    assert_eq!(grouped.dropped_markers, 0);
}

#[test]
fn overlapping_candidates_keep_longer() {
    let segments = vec![
        Segment::new("3. Phase 2: Analysis", "Title"),
        Segment::new("3. Analysis Techniques", "Section header"),
        Segment::from_text(
            r#"The capabilities of these algorithms build directly on the "Analysis Techniques" discussed"#,
        ),
    ];
    let grouped = resolve_and_group(&segments);

    let pointers: Vec<_> = grouped
        .entities
        .iter()
        .filter(|e| e.entity_type == NamedEntityType::ReferencePointer)
        .collect();
    assert_eq!(pointers.len(), 1);
    assert_eq!(pointers[0].group_name, "3. Analysis Techniques");

    // the other title is uncited
    assert_eq!(grouped.dropped_markers, 1);
    assert!(grouped
        .group_by_name(NamedEntityType::Reference, "3. Phase 2: Analysis")
        .is_none());
}

#[test]
fn uncited_destination_is_absent() {
    let segments = vec![
        Segment::new("Annex II", "Title"),
        Segment::from_text("Nothing here cites anything."),
    ];
    let mut resolver = ReferenceResolver::default();
    let entities = resolver.resolve(&segments);
    assert_eq!(entities.len(), 1);

    let grouped = GroupingEngine::default().group(entities, &segments);
    assert!(grouped.groups.is_empty());
    assert!(grouped.entities.is_empty());
    assert_eq!(grouped.dropped_markers, 1);
    // still registered for later documents
    assert_eq!(resolver.new_destination_records(&segments).len(), 1);
}

#[test]
fn repeated_citations_share_a_group() {
    let segments = vec![
        Segment::new("Section 2.1", "Section header"),
        Segment::from_text("Section 2.1 is important. See also Section 2.1 for more details."),
    ];
    let grouped = resolve_and_group(&segments);

    let group = grouped
        .group_by_name(NamedEntityType::ReferencePointer, "Section 2.1")
        .expect("pointer group");
    let spans: Vec<_> = grouped
        .members(group)
        .map(|e| (e.character_start, e.character_end))
        .collect();
    assert_eq!(spans, vec![(0, 11), (35, 46)]);
}

#[test]
fn longer_token_is_not_a_citation() {
    let segments = vec![
        Segment::new("Section 1", "Title"),
        Segment::from_text("Please see Section 1.1 for details."),
    ];
    let grouped = resolve_and_group(&segments);
    assert!(grouped
        .entities
        .iter()
        .all(|e| e.entity_type != NamedEntityType::ReferencePointer));
    assert_eq!(grouped.dropped_markers, 1);
}

#[test]
fn colon_title_cited_by_either_half() {
    let segments = vec![
        Segment::new("Document 3: Advanced Research", "Title"),
        Segment::from_text(r#"These results expand upon the "Advanced Research" presented earlier"#),
        Segment::from_text("As stated in Document 3 above"),
    ];
    let grouped = resolve_and_group(&segments);
    let group = grouped
        .group_by_name(NamedEntityType::ReferencePointer, "Document 3: Advanced Research")
        .expect("pointer group");
    assert_eq!(group.members.len(), 2);
}
