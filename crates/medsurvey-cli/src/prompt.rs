//! Terminal prompts. dialoguer blocks on the tty, so each prompt runs on the
//! blocking pool.

use eyre::{Result, WrapErr};

async fn blocking<F>(label: &'static str, f: F) -> Result<String>
where
    F: FnOnce() -> dialoguer::Result<String> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .wrap_err("prompt task failed")?
        .wrap_err_with(|| format!("failed to read {label}"))
}

/// Hidden input; nothing is echoed.
pub async fn password(label: &'static str) -> Result<String> {
    blocking(label, move || {
        dialoguer::Password::new().with_prompt(label).interact()
    })
    .await
}

/// Hidden input typed twice.
pub async fn new_password(label: &'static str) -> Result<String> {
    blocking(label, move || {
        dialoguer::Password::new()
            .with_prompt(label)
            .with_confirmation("Repeat password", "Passwords do not match")
            .interact()
    })
    .await
}

pub async fn text(label: &'static str) -> Result<String> {
    blocking(label, move || {
        dialoguer::Input::<String>::new()
            .with_prompt(label)
            .interact_text()
    })
    .await
}

/// Like [`text`], but an empty line is returned instead of re-prompting.
pub async fn line(label: &'static str) -> Result<String> {
    blocking(label, move || {
        dialoguer::Input::<String>::new()
            .with_prompt(label)
            .allow_empty(true)
            .interact_text()
    })
    .await
}
