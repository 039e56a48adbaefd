use cleanenv::validators::{bool, email, host, json, num, port, str, url};
use cleanenv::{Fallback, Options, RawEnv, SpecMap, SpecOptions, clean_env, test_only};

fn main() {
    let specs = SpecMap::new()
        .with("HOST", host(SpecOptions::new().default("localhost")))
        .with("PORT", port(SpecOptions::new().default("8080")))
        .with("DEBUG", bool(SpecOptions::new().default("false").dev_default("true")))
        .with("RATIO", num(SpecOptions::new().default(Fallback::raw("0.5"))))
        .with("LIMITS", json(SpecOptions::new().optional()))
        .with("ADMIN", email(SpecOptions::new().default(test_only("admin@example.com"))))
        .with("HOMEPAGE", url(SpecOptions::new().example("https://example.com")))
        .with(
            "LEVEL",
            str(SpecOptions::new()
                .choices(["low", "high"])
                .default("low")
                .desc("Verbosity")),
        );

    let template: String = specs.env_example();
    let _ = template;

    let raw = RawEnv::from_pairs([("HOMEPAGE", "https://example.com")]);
    if let Ok(env) = clean_env(raw, &specs, Options::new().no_dotenv()) {
        let _port: Option<i64> = env.get_i64("PORT");
        let _debug: Option<bool> = env.get_bool("DEBUG");
        let _flags = (env.is_dev(), env.is_test(), env.is_prod());
        let _value = &env["HOST"];
    }
}
