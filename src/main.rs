use webcam_describe::camera::{self, NokhwaBackend};
use webcam_describe::vision::{VisionClient, VisionError, OPENAI_API_KEY_ENV};

/// Load environment variables from a .env file, if present.
///
/// Does not override variables already set in the process environment.
fn load_env() {
    let _ = dotenv::dotenv();
}

fn run() -> Result<(), String> {
    // Credential check comes first: no camera or network access is
    // attempted without it.
    let client = VisionClient::new().map_err(|e| match e {
        VisionError::MissingApiKey => format!(
            "{} environment variable is not set.\n\n\
            Set it in a .env file or export it:\n\
                export {}=\"your-api-key-here\"",
            OPENAI_API_KEY_ENV, OPENAI_API_KEY_ENV
        ),
        other => format!("Failed to create vision client: {}", other),
    })?;

    println!("Capturing image...");
    let backend = NokhwaBackend;
    let base64_image = camera::capture_snapshot(&backend).map_err(|e| e.to_string())?;

    println!("Analyzing image...");
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| format!("Failed to create async runtime: {}", e))?;
    let result = rt.block_on(client.describe_image(&base64_image));

    println!();
    println!("Analysis result:");
    println!("{}", result);

    Ok(())
}

fn main() {
    load_env();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
