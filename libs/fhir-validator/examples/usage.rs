use cuprum_model::{Element, Value};
use cuprum_schema::{
    Cardinality, DefaultSchemaContext, FieldDef, FieldKind, PrimitiveKind, SchemaContext,
    TypeKind, TypeSchema,
};
use cuprum_validator::{Validator, ValidatorConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example 1: defaults
    let plan = ValidatorConfig::new().compile()?;
    println!("default plan: fail_fast={}, cap={}", plan.fail_fast, plan.max_issues);

    // Example 2: builder pattern
    let custom = ValidatorConfig::new()
        .fail_fast(true)
        .max_issues(500)
        .check_references(false);
    let plan = custom.compile()?;
    println!("custom plan: fail_fast={}, cap={}", plan.fail_fast, plan.max_issues);

    // Example 3: JSON configuration
    let json = r#"
    {
        "fail_fast": false,
        "max_issues": 100
    }
    "#;
    let config: ValidatorConfig = serde_json::from_str(json)?;
    let plan = config.compile()?;
    println!("json plan: cap={}", plan.max_issues);

    // Example 4: error handling
    match ValidatorConfig::new().max_issues(0).compile() {
        Ok(_) => println!("should not happen"),
        Err(e) => println!("caught expected error: {}", e),
    }

    // Example 5: running the engine
    let mut ctx = DefaultSchemaContext::new();
    ctx.register(
        TypeSchema::new("Patient", TypeKind::Resource).field(FieldDef::new(
            "active",
            FieldKind::Primitive(PrimitiveKind::Boolean),
            Cardinality::required(),
        )),
    )?;

    let schema = ctx.schema("Patient").expect("registered above");
    let patient = Element::builder(schema)
        .set("active", Value::boolean(true))
        .build()?;

    let validator = Validator::from_config(&ValidatorConfig::new(), ctx)?;
    let outcome = validator.validate(&patient);
    println!(
        "validated {}: valid={}",
        outcome.resource_type.as_deref().unwrap_or("?"),
        outcome.valid
    );
    println!("{}", serde_json::to_string_pretty(&outcome.to_operation_outcome())?);

    Ok(())
}
