//! End-to-end grouping behaviour on small batches.

use lexner::grouping::GroupingEngine;
use lexner::{Config, GroupOrigin, Language, NamedEntity, NamedEntityType};

fn entity(entity_type: NamedEntityType, text: &str) -> NamedEntity {
    NamedEntity::new(entity_type, text)
}

fn person(text: &str) -> NamedEntity {
    entity(NamedEntityType::Person, text)
}

#[test]
fn accent_variants_form_one_person() {
    let grouped = GroupingEngine::default().group(vec![person("María Diaz"), person("Maria Díaz")], &[]);
    assert_eq!(grouped.groups.len(), 1);
    assert_eq!(grouped.groups[0].name, "María Diaz");
}

#[test]
fn initials_merge_under_longest_name() {
    let grouped = GroupingEngine::default().group(
        vec![person("M. Diaz"), person("María Diaz"), person("María D.")],
        &[],
    );
    assert_eq!(grouped.groups.len(), 1);
    assert_eq!(grouped.groups[0].name, "María Diaz");
    assert_eq!(grouped.groups[0].members, vec![0, 1, 2]);
}

#[test]
fn dates_group_by_calendar_day() {
    let grouped = GroupingEngine::default().group(
        vec![
            entity(NamedEntityType::Date, "12 May 2023"),
            entity(NamedEntityType::Date, "twelve may 2023"),
        ],
        &[],
    );
    assert_eq!(grouped.groups.len(), 1);
    let group = &grouped.groups[0];
    assert_eq!(group.name, "2023-05-12");

    let texts: Vec<_> = grouped.members(group).map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["12 May 2023", "twelve may 2023"]);
    assert!(grouped.members(group).all(|e| e.normalized_text == "2023-05-12"));
}

#[test]
fn numeric_dates_follow_document_language() {
    let config = Config::default().with_language(Language::Spanish);
    let grouped = GroupingEngine::from_config(&config).group(
        vec![
            entity(NamedEntityType::Date, "03/04/2023"),
            entity(NamedEntityType::Date, "3 de abril de 2023"),
        ],
        &[],
    );
    assert_eq!(grouped.groups.len(), 1);
    assert_eq!(grouped.groups[0].name, "2023-04-03");
}

#[test]
fn unparseable_date_keeps_raw_text() {
    let grouped = GroupingEngine::default().group(
        vec![
            entity(NamedEntityType::Date, "sometime next year"),
            entity(NamedEntityType::Date, "12 May 2023"),
        ],
        &[],
    );
    assert_eq!(grouped.groups.len(), 2);
    assert_eq!(grouped.groups[0].name, "sometime next year");
    assert_eq!(grouped.entities[0].normalized_text, "sometime next year");
}

#[test]
fn countries_group_by_iso_code() {
    let grouped = GroupingEngine::default().group(
        vec![
            entity(NamedEntityType::Location, "Spain"),
            entity(NamedEntityType::Location, "España"),
            entity(NamedEntityType::Location, "Valencia"),
        ],
        &[],
    );
    assert_eq!(grouped.groups.len(), 2);
    assert_eq!(grouped.groups[0].name, "España");
    assert_eq!(grouped.groups[0].members, vec![0, 1]);
    assert_eq!(grouped.groups[1].name, "Valencia");
}

#[test]
fn word_order_does_not_matter() {
    let grouped = GroupingEngine::default().group(
        vec![
            entity(NamedEntityType::Organization, "Banco Central"),
            entity(NamedEntityType::Organization, "Central, Banco"),
        ],
        &[],
    );
    assert_eq!(grouped.groups.len(), 1);
    // lengths within one character: the comma form wins
    assert_eq!(grouped.groups[0].name, "Central, Banco");
}

#[test]
fn same_text_different_type_stays_apart() {
    let grouped = GroupingEngine::default().group(
        vec![
            entity(NamedEntityType::Organization, "Santander"),
            entity(NamedEntityType::Location, "Santander"),
        ],
        &[],
    );
    assert_eq!(grouped.groups.len(), 2);
}

#[test]
fn prior_group_keeps_identity() {
    let first = GroupingEngine::default().group(vec![person("María Diaz")], &[]);
    let records = first.to_records(&[]);

    let second = GroupingEngine::default()
        .with_prior_groups(records)
        .group(vec![person("Maria Díaz"), person("Ana Ruiz")], &[]);

    assert_eq!(second.groups[0].name, "María Diaz");
    assert_eq!(second.groups[0].origin, GroupOrigin::Prior);
    assert_eq!(second.entities[0].group_name, "María Diaz");
    assert_eq!(second.groups[1].origin, GroupOrigin::Batch);
}
