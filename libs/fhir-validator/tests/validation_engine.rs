//! Engine tests: deep path attribution, run limits, and plan toggles.

use cuprum_model::{Element, Reference, Value};
use cuprum_schema::{
    Cardinality, DefaultSchemaContext, FieldDef, FieldKind, PrimitiveKind, SchemaContext,
    TypeKind, TypeSchema,
};
use cuprum_validator::{IssueCode, IssueSeverity, Validator, ValidatorConfig};
use smallvec::smallvec;
use std::sync::Arc;

fn context() -> DefaultSchemaContext {
    let mut ctx = DefaultSchemaContext::new();
    ctx.register(
        TypeSchema::new("HumanName", TypeKind::Complex).field(FieldDef::new(
            "family",
            FieldKind::Primitive(PrimitiveKind::String),
            Cardinality::required(),
        )),
    )
    .unwrap();
    ctx.register(
        TypeSchema::new("PatientContact", TypeKind::Backbone)
            .field(FieldDef::new(
                "name",
                FieldKind::Complex("HumanName".into()),
                Cardinality::required(),
            ))
            .field(FieldDef::new(
                "organization",
                FieldKind::Reference {
                    targets: Some(smallvec!["Organization".to_string()]),
                },
                Cardinality::optional(),
            )),
    )
    .unwrap();
    ctx.register(
        TypeSchema::new("Patient", TypeKind::Resource)
            .field(FieldDef::new(
                "active",
                FieldKind::Primitive(PrimitiveKind::Boolean),
                Cardinality::optional(),
            ))
            .field(FieldDef::new(
                "contact",
                FieldKind::Complex("PatientContact".into()),
                Cardinality::repeating(),
            )),
    )
    .unwrap();
    ctx
}

fn validator(config: ValidatorConfig) -> Validator<DefaultSchemaContext> {
    Validator::from_config(&config, context()).unwrap()
}

fn contact(ctx: &DefaultSchemaContext, with_name: bool, org: Option<Reference>) -> Element {
    let mut builder = Element::builder(ctx.schema("PatientContact").unwrap());
    if with_name {
        let name = Element::builder(ctx.schema("HumanName").unwrap())
            .set("family", Value::string("Contact"))
            .build()
            .unwrap();
        builder = builder.set("name", name);
    }
    if let Some(org) = org {
        builder = builder.set("organization", org);
    }
    builder.build_unchecked()
}

#[test]
fn valid_tree_produces_clean_outcome() {
    let ctx = context();
    let patient = Element::builder(ctx.schema("Patient").unwrap())
        .set("active", Value::boolean(true))
        .add("contact", contact(&ctx, true, None))
        .build()
        .unwrap();

    let outcome = validator(ValidatorConfig::new()).validate(&patient);
    assert!(outcome.valid);
    assert!(outcome.issues.is_empty());
    assert_eq!(outcome.resource_type.as_deref(), Some("Patient"));
}

#[test]
fn nested_violation_carries_full_path() {
    let ctx = context();
    let patient = Element::builder(ctx.schema("Patient").unwrap())
        .set("active", Value::boolean(true))
        .add("contact", contact(&ctx, true, None))
        .add("contact", contact(&ctx, false, Some(Reference::to("Organization/1"))))
        .build_unchecked();

    let outcome = validator(ValidatorConfig::new()).validate(&patient);
    assert!(!outcome.valid);

    let issue = outcome
        .issues
        .iter()
        .find(|i| i.code == IssueCode::Required)
        .expect("missing-name issue");
    assert_eq!(
        issue.location.as_deref(),
        Some("Patient.contact[1].name")
    );
    assert!(issue.diagnostics.contains("name"));
}

#[test]
fn reference_issues_respect_plan_toggle() {
    let ctx = context();
    let patient = Element::builder(ctx.schema("Patient").unwrap())
        .add(
            "contact",
            contact(&ctx, true, Some(Reference::to("Device/9"))),
        )
        .build_unchecked();

    let strict = validator(ValidatorConfig::new()).validate(&patient);
    let issue = strict
        .issues
        .iter()
        .find(|i| i.code == IssueCode::Value)
        .expect("reference issue");
    assert_eq!(
        issue.location.as_deref(),
        Some("Patient.contact[0].organization")
    );

    let lax = validator(ValidatorConfig::new().check_references(false)).validate(&patient);
    assert!(lax.valid, "reference checking disabled: {:?}", lax.issues);
}

#[test]
fn fail_fast_stops_at_first_failing_element() {
    let ctx = context();
    let patient = Element::builder(ctx.schema("Patient").unwrap())
        .add("contact", contact(&ctx, false, None))
        .add("contact", contact(&ctx, false, None))
        .build_unchecked();

    let batched = validator(ValidatorConfig::new()).validate(&patient);
    let eager = validator(ValidatorConfig::new().fail_fast(true)).validate(&patient);

    assert!(batched.error_count() > eager.error_count());
    assert!(!eager.valid);
}

#[test]
fn issue_cap_is_enforced() {
    let ctx = context();
    let mut builder = Element::builder(ctx.schema("Patient").unwrap());
    for _ in 0..10 {
        builder = builder.add("contact", contact(&ctx, false, None));
    }
    let patient = builder.build_unchecked();

    let outcome = validator(ValidatorConfig::new().max_issues(3)).validate(&patient);
    assert_eq!(outcome.issues.len(), 3);
}

#[test]
fn unregistered_type_surfaces_as_warning() {
    let foreign = Arc::new(TypeSchema::new("Specimen", TypeKind::Resource).field(
        FieldDef::new(
            "status",
            FieldKind::Primitive(PrimitiveKind::Code),
            Cardinality::optional(),
        ),
    ));
    let specimen = Element::builder(foreign)
        .set("status", Value::code("available").unwrap())
        .build()
        .unwrap();

    let outcome = validator(ValidatorConfig::new()).validate(&specimen);
    // Structurally sound, but flagged as foreign to the context
    assert!(outcome.valid);
    assert_eq!(outcome.warning_count(), 1);
    assert_eq!(outcome.issues[0].severity, IssueSeverity::Warning);
    assert_eq!(outcome.issues[0].code, IssueCode::Unknown);
}
