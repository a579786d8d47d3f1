use std::io::Cursor;
use std::time::Duration;

use clap::Parser;
use tempfile::TempDir;

use super::args::{Cli, Commands, GenerateArgs};
use super::commands::{
    BACK_COMMAND, execute_config_command, execute_generate_command, form_from_args, run_wizard,
    write_image,
};
use crate::progress::GENERATION_MESSAGES;
use crate::test_support::{ScriptedGenerator, artisan_coffee_ad, artisan_coffee_form};
use crate::{AdcraftError, Config, ExitCode, Stage, WizardSession};

fn generate_args(name: &str, description: &str, audience: &str) -> GenerateArgs {
    GenerateArgs {
        product_name: name.to_string(),
        product_description: description.to_string(),
        target_audience: audience.to_string(),
        json: false,
        image_out: None,
    }
}

fn coffee_args() -> GenerateArgs {
    let form = artisan_coffee_form();
    generate_args(
        &form.product_name,
        &form.product_description,
        &form.target_audience,
    )
}

/// Feed `script` to the wizard and return everything it printed.
async fn drive(session: &mut WizardSession<ScriptedGenerator>, script: &str) -> String {
    let mut input = Cursor::new(script.as_bytes().to_vec());
    let mut output = Vec::new();
    run_wizard(session, &mut input, &mut output).await.unwrap();
    String::from_utf8(output).unwrap()
}

fn coffee_script(rest: &str) -> String {
    let form = artisan_coffee_form();
    format!(
        "{}\n{}\n{}\n{rest}",
        form.product_name, form.product_description, form.target_audience
    )
}

// ===== Argument parsing =====

#[test]
fn test_no_subcommand_defaults_to_wizard() {
    let cli = Cli::try_parse_from(["adcraft"]).unwrap();
    assert!(cli.command.is_none());
    assert_eq!(cli.command.unwrap_or(Commands::Wizard), Commands::Wizard);
}

#[test]
fn test_global_flags_become_config_overrides() {
    let cli = Cli::try_parse_from([
        "adcraft",
        "config",
        "--text-model",
        "gemini-2.5-pro",
        "--image-model",
        "imagen-4.0-fast-generate-001",
        "--request-timeout",
        "30",
        "-v",
    ])
    .unwrap();

    let overrides = cli.config_overrides();
    assert_eq!(overrides.text_model.as_deref(), Some("gemini-2.5-pro"));
    assert_eq!(
        overrides.image_model.as_deref(),
        Some("imagen-4.0-fast-generate-001")
    );
    assert_eq!(overrides.request_timeout, Some(30));
    assert_eq!(overrides.verbose, Some(true));
}

#[test]
fn test_verbose_absent_does_not_override_file() {
    let cli = Cli::try_parse_from(["adcraft", "wizard"]).unwrap();
    assert_eq!(cli.config_overrides().verbose, None);
}

#[test]
fn test_generate_requires_all_three_fields() {
    assert!(Cli::try_parse_from(["adcraft", "generate", "--product-name", "Coffee"]).is_err());

    let cli = Cli::try_parse_from([
        "adcraft",
        "generate",
        "--product-name",
        "Coffee",
        "--product-description",
        "Beans",
        "--target-audience",
        "Everyone",
        "--json",
        "--image-out",
        "ad.jpg",
    ])
    .unwrap();
    let Some(Commands::Generate(args)) = cli.command else {
        panic!("expected generate");
    };
    assert!(args.json);
    assert_eq!(args.image_out.unwrap().to_str(), Some("ad.jpg"));
}

#[test]
fn test_build_cli_lists_commands() {
    let cmd = super::build_cli();
    let names: Vec<&str> = cmd.get_subcommands().map(|c| c.get_name()).collect();
    assert_eq!(names, vec!["wizard", "generate", "config"]);
}

// ===== Generate command =====

#[test]
fn test_blank_flag_is_invalid_input() {
    let err = form_from_args(&generate_args("Coffee", "   ", "Everyone")).unwrap_err();
    assert!(matches!(
        &err,
        AdcraftError::InvalidInput { field, .. } if field == "product-description"
    ));
    assert_eq!(err.to_exit_code(), ExitCode::CLI_ARGS);
}

#[test]
fn test_form_from_args_trims_values() {
    let form = form_from_args(&generate_args(" Coffee ", "Beans\n", "Everyone")).unwrap();
    assert_eq!(form.product_name, "Coffee");
    assert_eq!(form.product_description, "Beans");
}

#[tokio::test]
async fn test_generate_prints_review() {
    let generator = ScriptedGenerator::new();
    let args = coffee_args();
    let mut out = Vec::new();

    execute_generate_command(
        &generator,
        artisan_coffee_form(),
        &args,
        &Config::minimal_for_testing(),
        &mut out,
    )
    .await
    .unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Fresh Roasted Daily"));
    assert!(text.contains("Seattle, Portland"));
    assert_eq!(generator.calls().get(), 1);
}

#[tokio::test]
async fn test_generate_json_and_image_out() {
    let dir = TempDir::new().unwrap();
    let image_path = dir.path().join("ad.jpg");
    let mut args = coffee_args();
    args.json = true;
    args.image_out = Some(image_path.clone());
    let mut out = Vec::new();

    execute_generate_command(
        &ScriptedGenerator::new(),
        artisan_coffee_form(),
        &args,
        &Config::minimal_for_testing(),
        &mut out,
    )
    .await
    .unwrap();

    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json["schemaVersion"], "adcraft-ad.v1");
    assert_eq!(json["textModel"], "gemini-2.5-flash");
    assert_eq!(json["ad"]["creative"]["headline"], "Fresh Roasted Daily");
    assert_eq!(json["ad"]["targeting"]["ageRange"], "25-40");
    assert!(json["generatedAt"].as_str().is_some());

    assert_eq!(
        std::fs::read(&image_path).unwrap(),
        vec![0xFF, 0xD8, 0xFF, 0xD9]
    );
}

#[tokio::test]
async fn test_generate_failure_maps_to_generation_exit_code() {
    let generator = ScriptedGenerator::new().then_no_image();
    let mut out = Vec::new();

    let err = execute_generate_command(
        &generator,
        artisan_coffee_form(),
        &coffee_args(),
        &Config::minimal_for_testing(),
        &mut out,
    )
    .await
    .unwrap_err();

    let adcraft_err = err.downcast_ref::<AdcraftError>().unwrap();
    assert_eq!(adcraft_err.to_exit_code(), ExitCode::GENERATION_FAILED);
    assert!(adcraft_err.to_string().contains("No image was generated."));
    assert!(out.is_empty());
}

#[test]
fn test_write_image_rejects_non_data_uri() {
    let dir = TempDir::new().unwrap();
    let err = write_image("https://example.com/ad.jpg", &dir.path().join("ad.jpg")).unwrap_err();
    assert!(matches!(err, AdcraftError::Io(_)));
    assert!(!dir.path().join("ad.jpg").exists());
}

// ===== Config command =====

#[test]
fn test_config_command_lists_sources() {
    let config = Config::builder().text_model("gemini-2.5-pro").build().unwrap();
    let mut out = Vec::new();
    execute_config_command(&config, false, &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("text_model"));
    assert!(text.contains("gemini-2.5-pro (programmatic)"));
    assert!(text.contains("imagen-4.0-generate-001 (default)"));
    assert!(text.contains("API key: $API_KEY is"));
}

#[test]
fn test_config_command_json() {
    let mut out = Vec::new();
    execute_config_command(&Config::minimal_for_testing(), true, &mut out).unwrap();

    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json["effectiveConfig"]["request_timeout"]["value"], "120");
    assert_eq!(json["effectiveConfig"]["request_timeout"]["source"], "default");
    assert!(json["apiKeyPresent"].is_boolean());
}

// ===== Interactive wizard =====

#[tokio::test]
async fn test_wizard_reaches_review_and_prints_headline() {
    let mut session = WizardSession::new(ScriptedGenerator::new());
    let text = drive(&mut session, &coffee_script("q\n")).await;

    assert!(text.contains("Step 1 of 4: Product Info"));
    assert!(text.contains("Step 2 of 4: Audience"));
    assert!(text.contains("Step 3 of 4: Generate"));
    assert!(text.contains("Crafting compelling ad copy..."));
    assert!(text.contains("Fresh Roasted Daily"));
    assert_eq!(session.stage(), Stage::Reviewing);
    assert_eq!(session.generator().calls().get(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_wizard_rotates_progress_messages_while_generating() {
    // Ticks land at 2.5 s and 5 s; the ad arrives at 6 s.
    let generator = ScriptedGenerator::new().with_delay(Duration::from_secs(6));
    let mut session = WizardSession::new(generator);
    let text = drive(&mut session, &coffee_script("q\n")).await;

    let shown: Vec<usize> = GENERATION_MESSAGES[..3]
        .iter()
        .map(|message| text.find(message).unwrap())
        .collect();
    assert!(shown.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(!text.contains(GENERATION_MESSAGES[3]));
    assert!(text.find("Fresh Roasted Daily").unwrap() > shown[2]);
    assert_eq!(session.generator().calls().get(), 1);
}

#[tokio::test]
async fn test_wizard_failure_shows_banner_and_returns_to_audience() {
    let mut session = WizardSession::new(ScriptedGenerator::new().then_no_image());
    // Enter on the audience prompt keeps the answer and retries.
    let text = drive(&mut session, &coffee_script("\nq\n")).await;

    let banner = text.find("✗ Ad generation failed").unwrap();
    let retry_prompt = text[banner..].find("Target Audience [").unwrap();
    assert!(text[banner..].contains("No image was generated."));
    assert!(retry_prompt > 0);
    assert!(text.contains("Fresh Roasted Daily"));
    assert_eq!(session.generator().calls().get(), 2);
    assert!(session.view().error.is_none());
}

#[tokio::test]
async fn test_wizard_blank_answer_shows_hint_without_generating() {
    let mut session = WizardSession::new(ScriptedGenerator::new());
    let text = drive(&mut session, "Artisan Coffee\n\n").await;

    assert!(text.contains("Please fill in: Product Name, Product Description"));
    assert_eq!(session.stage(), Stage::CollectingProduct);
    assert_eq!(session.generator().calls().get(), 0);
}

#[tokio::test]
async fn test_wizard_back_keeps_product_answers() {
    let mut session = WizardSession::new(ScriptedGenerator::new());
    let script = format!("Artisan Coffee\nBeans\n{BACK_COMMAND}\n\nRoasted beans\n");
    let text = drive(&mut session, &script).await;

    assert!(text.contains("Product Name [Artisan Coffee]: "));
    assert_eq!(session.stage(), Stage::CollectingAudience);
    assert_eq!(
        session.controller().form().product_description,
        "Roasted beans"
    );
    assert_eq!(session.generator().calls().get(), 0);
}

#[tokio::test]
async fn test_wizard_new_ad_resets_and_save_writes_image() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("saved.jpg");
    let mut session = WizardSession::new(ScriptedGenerator::new());
    let script = coffee_script(&format!("s {}\nn\n", path.display()));

    let text = drive(&mut session, &script).await;

    assert!(text.contains("Saved 4 bytes to"));
    assert_eq!(
        std::fs::read(&path).unwrap(),
        vec![0xFF, 0xD8, 0xFF, 0xD9]
    );
    assert_eq!(session.stage(), Stage::CollectingProduct);
    assert!(session.view().ad.is_none());
    assert!(text.matches("Step 1 of 4").count() >= 2);
}

#[tokio::test]
async fn test_wizard_unknown_review_choice_reprompts() {
    let mut session = WizardSession::new(ScriptedGenerator::new());
    let text = drive(&mut session, &coffee_script("x\nq\n")).await;
    assert!(text.contains("Unknown choice 'x'"));
    assert_eq!(session.view().ad, Some(&artisan_coffee_ad()));
}
