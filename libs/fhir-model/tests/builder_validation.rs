//! End-to-end builder lifecycle tests over a small clinical schema set.

use cuprum_model::{Element, Extension, Reference, Value, Violation};
use cuprum_schema::{Cardinality, FieldDef, FieldKind, PrimitiveKind, TypeKind, TypeSchema};
use smallvec::smallvec;
use std::sync::Arc;

fn human_name() -> Arc<TypeSchema> {
    Arc::new(
        TypeSchema::new("HumanName", TypeKind::Complex)
            .field(FieldDef::new(
                "family",
                FieldKind::Primitive(PrimitiveKind::String),
                Cardinality::optional(),
            ))
            .field(FieldDef::new(
                "given",
                FieldKind::Primitive(PrimitiveKind::String),
                Cardinality::repeating(),
            )),
    )
}

fn patient_contact() -> Arc<TypeSchema> {
    Arc::new(
        TypeSchema::new("PatientContact", TypeKind::Backbone)
            .field(FieldDef::new(
                "name",
                FieldKind::Complex("HumanName".into()),
                Cardinality::optional(),
            ))
            .field(FieldDef::new(
                "organization",
                FieldKind::Reference {
                    targets: Some(smallvec!["Organization".to_string()]),
                },
                Cardinality::optional(),
            )),
    )
}

fn patient() -> Arc<TypeSchema> {
    Arc::new(
        TypeSchema::new("Patient", TypeKind::Resource)
            .field(FieldDef::new(
                "active",
                FieldKind::Primitive(PrimitiveKind::Boolean),
                Cardinality::optional(),
            ))
            .field(FieldDef::new(
                "name",
                FieldKind::Complex("HumanName".into()),
                Cardinality::repeating(),
            ))
            .field(FieldDef::new(
                "deceased",
                FieldKind::Choice(smallvec![
                    "boolean".parse().unwrap(),
                    "dateTime".parse().unwrap(),
                ]),
                Cardinality::optional(),
            ))
            .field(FieldDef::new(
                "generalPractitioner",
                FieldKind::Reference {
                    targets: Some(smallvec![
                        "Practitioner".to_string(),
                        "Organization".to_string(),
                    ]),
                },
                Cardinality::repeating(),
            ))
            .field(FieldDef::new(
                "contact",
                FieldKind::Complex("PatientContact".into()),
                Cardinality::repeating(),
            )),
    )
}

/// MedicationAdministration-like type with required fields, for the
/// required-reference scenario.
fn administration() -> Arc<TypeSchema> {
    Arc::new(
        TypeSchema::new("MedicationAdministration", TypeKind::Resource)
            .field(FieldDef::new(
                "status",
                FieldKind::Primitive(PrimitiveKind::Code),
                Cardinality::required(),
            ))
            .field(FieldDef::new(
                "subject",
                FieldKind::Reference {
                    targets: Some(smallvec!["Patient".to_string(), "Group".to_string()]),
                },
                Cardinality::required(),
            ))
            .field(FieldDef::new(
                "occurrence",
                FieldKind::Choice(smallvec![
                    "dateTime".parse().unwrap(),
                    "Period".parse().unwrap(),
                ]),
                Cardinality::optional(),
            )),
    )
}

fn valid_patient() -> Element {
    let name = Element::builder(human_name())
        .set("family", Value::string("Everyman"))
        .add("given", Value::string("Adam"))
        .build()
        .unwrap();

    Element::builder(patient())
        .id("pat-1")
        .set("active", Value::boolean(true))
        .add("name", name)
        .set("deceased", Value::boolean(false))
        .add("generalPractitioner", Reference::to("Practitioner/7"))
        .build()
        .unwrap()
}

#[test]
fn round_trip_through_builder() {
    let original = valid_patient();
    let rebuilt = original.to_builder().build().unwrap();
    assert_eq!(original, rebuilt);
}

#[test]
fn idempotent_freeze() {
    let builder = Element::builder(human_name()).set("family", Value::string("Chalmers"));
    let first = builder.clone().build().unwrap();
    let second = builder.build().unwrap();
    assert_eq!(first, second);
}

#[test]
fn required_field_enforced() {
    let err = Element::builder(administration())
        .set("subject", Reference::to("Patient/1"))
        .build()
        .unwrap_err();
    assert!(err.mentions("status"));
    assert!(err.to_string().contains("status"));

    let ok = Element::builder(administration())
        .set("status", Value::code("completed").unwrap())
        .set("subject", Reference::to("Patient/1"))
        .build();
    assert!(ok.is_ok());
}

#[test]
fn choice_accepts_every_member() {
    for value in [
        Value::boolean(true),
        Value::date_time("2024-01-15T10:30:00Z").unwrap(),
    ] {
        let built = Element::builder(patient()).set("deceased", value).build();
        assert!(built.is_ok());
    }
}

#[test]
fn choice_rejects_outside_type() {
    let err = Element::builder(patient())
        .set("deceased", Value::integer(1))
        .build()
        .unwrap_err();

    assert!(err.violations.iter().any(|v| matches!(
        v,
        Violation::ChoiceType { field, found } if field == "deceased" && found == "integer"
    )));
}

#[test]
fn choice_accepts_complex_member() {
    let period = Arc::new(
        TypeSchema::new("Period", TypeKind::Complex)
            .field(FieldDef::new(
                "start",
                FieldKind::Primitive(PrimitiveKind::DateTime),
                Cardinality::optional(),
            ))
            .field(FieldDef::new(
                "end",
                FieldKind::Primitive(PrimitiveKind::DateTime),
                Cardinality::optional(),
            )),
    );
    let window = Element::builder(period)
        .set("start", Value::date_time("2024-01-01").unwrap())
        .build()
        .unwrap();

    let built = Element::builder(administration())
        .set("status", Value::code("completed").unwrap())
        .set("subject", Reference::to("Patient/1"))
        .set("occurrence", window)
        .build();
    assert!(built.is_ok());
}

#[test]
fn reference_allow_list() {
    for target in ["Patient/123", "Group/5"] {
        let built = Element::builder(administration())
            .set("status", Value::code("completed").unwrap())
            .set("subject", Reference::to(target))
            .build();
        assert!(built.is_ok(), "expected {} to be accepted", target);
    }

    let err = Element::builder(administration())
        .set("status", Value::code("completed").unwrap())
        .set("subject", Reference::to("Device/9"))
        .build()
        .unwrap_err();
    assert!(err.violations.iter().any(|v| matches!(
        v,
        Violation::ReferenceType { field, found, .. } if field == "subject" && found == "Device"
    )));
}

#[test]
fn unresolvable_reference_is_skipped() {
    let built = Element::builder(administration())
        .set("status", Value::code("completed").unwrap())
        .set("subject", Reference::to("urn:uuid:0000-1111"))
        .build();
    assert!(built.is_ok());
}

#[test]
fn reference_list_reports_each_bad_entry() {
    let err = Element::builder(patient())
        .set("active", Value::boolean(true))
        .add("generalPractitioner", Reference::to("Practitioner/1"))
        .add("generalPractitioner", Reference::to("Device/2"))
        .add("generalPractitioner", Reference::to("Medication/3"))
        .build()
        .unwrap_err();

    let bad: Vec<_> = err
        .violations
        .iter()
        .filter(|v| matches!(v, Violation::ReferenceType { .. }))
        .collect();
    assert_eq!(bad.len(), 2);
    assert!(err.violations.contains(&Violation::ReferenceType {
        field: "generalPractitioner".into(),
        entry: Some(1),
        found: "Device".into(),
    }));
    assert!(err.violations.contains(&Violation::ReferenceType {
        field: "generalPractitioner".into(),
        entry: Some(2),
        found: "Medication".into(),
    }));
}

#[test]
fn empty_backbone_rejected() {
    let err = Element::builder(patient_contact()).build().unwrap_err();
    assert!(err.violations.contains(&Violation::EmptyElement));
}

#[test]
fn empty_entry_in_list_rejected() {
    let empty_name = Element::builder(human_name()).build_unchecked();
    let err = Element::builder(patient())
        .set("active", Value::boolean(true))
        .add("name", empty_name)
        .build()
        .unwrap_err();

    assert!(err.violations.iter().any(|v| matches!(
        v,
        Violation::EmptyEntry { field, index: 0 } if field == "name"
    )));
}

#[test]
fn extension_counts_as_content() {
    let contact = Element::builder(patient_contact())
        .extension(Extension::new("http://example.org/note").with_value(Value::string("x")))
        .build();
    assert!(contact.is_ok());
}

#[test]
fn unknown_field_reported_not_panicked() {
    let err = Element::builder(patient())
        .set("active", Value::boolean(true))
        .set("species", Value::string("human"))
        .build()
        .unwrap_err();
    assert!(err.mentions("species"));
}

#[test]
fn violations_are_batched() {
    let err = Element::builder(administration())
        .set("subject", Reference::to("Device/9"))
        .set("occurrence", Value::integer(5))
        .build()
        .unwrap_err();

    // Missing status, bad subject target, bad occurrence type: all at once
    assert!(err.violations.len() >= 3);
    assert!(err.mentions("status"));
    assert!(err.mentions("subject"));
    assert!(err.mentions("occurrence"));
}

#[test]
fn build_unchecked_bypasses_all_checks() {
    let element = Element::builder(administration())
        .set("subject", Reference::to("Device/9"))
        .build_unchecked();
    assert_eq!(element.type_name(), "MedicationAdministration");
    assert!(element.reference("subject").is_some());
}

#[test]
fn scenario_required_then_bad_target_then_success() {
    // Required reference unset
    let err = Element::builder(administration())
        .set("status", Value::code("in-progress").unwrap())
        .build()
        .unwrap_err();
    assert!(err.mentions("subject"));

    // Out-of-allow-list type tag
    let err = Element::builder(administration())
        .set("status", Value::code("in-progress").unwrap())
        .set("subject", Reference::to("someid").with_type("Device"))
        .build()
        .unwrap_err();
    assert!(err.violations.iter().any(|v| matches!(
        v,
        Violation::ReferenceType { field, found, .. } if field == "subject" && found == "Device"
    )));

    // Corrected type tag
    let subject = Reference::to("someid").with_type("Patient");
    let built = Element::builder(administration())
        .set("status", Value::code("in-progress").unwrap())
        .set("subject", subject.clone())
        .build()
        .unwrap();
    assert_eq!(built.reference("subject"), Some(&subject));
}
