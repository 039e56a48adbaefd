use cleanenv::validators::str;
use cleanenv::{
    Draft, EnvValue, Error, ErrorReport, Options, RawEnv, Reporting, SpecMap, SpecOptions,
    clean_env,
};

fn main() {
    let specs = SpecMap::new().with(
        "TLS_CERT",
        str(SpecOptions::new().required_when(|env| {
            env.get("TLS").and_then(EnvValue::as_bool) == Some(true)
        })),
    );

    let options = Options::new()
        .dotenv_path(".env.local")
        .strict(true)
        .transformer(|draft: &mut Draft| {
            draft.remove("UNUSED");
        })
        .reporter(|report: ErrorReport<'_>| -> Result<(), Error> {
            for (key, err) in &report.errors {
                eprintln!("{key}: {err}");
            }
            Ok(())
        });
    let _ = clean_env(RawEnv::new(), &specs, options);

    let throwing = Options::default().no_dotenv().reporting(Reporting::Throw);
    let _ = clean_env(RawEnv::new(), &specs, throwing);
}
