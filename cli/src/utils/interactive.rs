use anyhow::Result;
use dialoguer::theme::ColorfulTheme;

/// Prompt for input
pub fn prompt_input(name: &str) -> Result<String> {
    let input = dialoguer::Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(name)
        .interact_text()?;

    Ok(input)
}

/// Prompt for a yes / no confirmation
pub fn prompt_confirm(name: &str) -> Result<bool> {
    let confirm = dialoguer::Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(name)
        .default(false)
        .interact()?;

    Ok(confirm)
}
