use cleanenv::{
    EnvValue, ParseError, RawEnv, Spec, SpecMap, SpecOptions, clean_env, make_validator,
};

fn parse_csv(raw: &str) -> Result<Option<EnvValue>, ParseError> {
    if raw.is_empty() {
        return Err(ParseError::new("empty list"));
    }
    let items: Vec<cleanenv::serde_json::Value> = raw.split(',').map(|s| s.trim().into()).collect();
    Ok(Some(EnvValue::Json(items.into())))
}

fn main() {
    let csv = make_validator(parse_csv);
    let upper = |options: SpecOptions| -> Spec {
        Spec::custom(|raw| Ok(Some(EnvValue::from(raw.to_uppercase()))), options)
    };

    let specs = SpecMap::new()
        .with("TAGS", csv(SpecOptions::new().default("a,b")))
        .with("REGION", upper(SpecOptions::new().default("eu")));

    let _ = clean_env(RawEnv::new(), &specs, cleanenv::Options::new().no_dotenv());
}
