use medi_config::MediConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &MediConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &MediConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.backend.is_customized() && has_single_underscore_key(&env_keys, "MEDIFIRE_BACKEND") {
        warnings.push(
            "Backend config appears default while MEDIFIRE_BACKEND* env vars exist. Use double underscores (example: MEDIFIRE_BACKEND__URL)."
                .to_string(),
        );
    }

    warnings
}

/// `MEDIFIRE_BACKEND_URL` style keys: the section prefix without the `__` separator.
fn has_single_underscore_key(keys: &[String], prefix: &str) -> bool {
    let nested = format!("{prefix}__");
    keys.iter()
        .any(|key| key.starts_with(prefix) && !key.starts_with(&nested))
}
