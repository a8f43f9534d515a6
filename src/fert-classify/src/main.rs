use std::error::Error;
use std::fs;
use std::path::PathBuf;

use fert_serve::api::{ErrorBody, ImagePayload, PredictionBody};
use fert_serve::{
    capture_instructions, resolve, ClassificationRequest, ClassificationResult, CropType,
    Recommendation, Timer,
};
use log::{debug, info};
use reqwest::StatusCode;
use serde::Serialize;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(
    name = "fert-classify",
    about = "CLI app to get a fertilization recommendation from a leaf photo"
)]
struct CmdArgs {
    #[structopt(help = "Crop in the photo: rice, melon, cucumber, tomato or other")]
    crop: CropType,

    #[structopt(
        parse(from_os_str),
        required_unless = "instructions",
        help = "Path to the leaf image"
    )]
    image_path: Option<PathBuf>,

    #[structopt(
        long,
        env = "FERT_PROXY_URL",
        default_value = "http://127.0.0.1:3000",
        help = "Base URL of the inference proxy"
    )]
    proxy_url: String,

    #[structopt(long, help = "Print how to photograph this crop and exit")]
    instructions: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    crop: CropType,
    prediction: &'a str,
    recommendation: Recommendation,
}

fn classify(
    proxy_url: &str,
    request: &ClassificationRequest,
) -> Result<ClassificationResult, Box<dyn Error>> {
    let url = format!("{}{}", proxy_url.trim_end_matches('/'), request.proxy_path());
    let mut t = Timer::start(format!("Classifying via {}", url));

    let payload = ImagePayload {
        image: Some(request.image_base64().to_owned()),
    };
    let response = reqwest::blocking::Client::new()
        .post(&url)
        .json(&payload)
        .send()?;

    let status = response.status();
    let text = response.text()?;
    t.stop();
    debug!("Proxy replied {}: {}", status, text);

    read_reply(status, &text)
}

/// Turn a proxy reply into a label, or into the proxy's own error message.
fn read_reply(status: StatusCode, text: &str) -> Result<ClassificationResult, Box<dyn Error>> {
    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(text)
            .map(|body| body.error)
            .unwrap_or_else(|_| text.trim().to_owned());
        return Err(format!("classification failed ({}): {}", status, message).into());
    }

    let body: PredictionBody = serde_json::from_str(text)?;
    Ok(ClassificationResult::new(body.prediction))
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = CmdArgs::from_args();

    if args.instructions {
        println!("{}", capture_instructions(args.crop));
        return Ok(());
    }

    let image_path = args.image_path.ok_or("an image path is required")?;
    let raw = fs::read(&image_path)?;
    info!("Read {} bytes from {}", raw.len(), image_path.display());

    let request = ClassificationRequest::new(args.crop, base64::encode(&raw))?;
    let result = classify(&args.proxy_url, &request)?;

    let report = Report {
        crop: request.crop(),
        prediction: &result.label,
        recommendation: resolve(request.crop(), &result.label),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proxy_error_body_becomes_the_error() {
        let err = read_reply(
            StatusCode::BAD_REQUEST,
            r#"{"error":"Image data is required"}"#,
        )
        .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("400"), "{}", message);
        assert!(message.ends_with("Image data is required"), "{}", message);
    }

    #[test]
    fn raw_text_is_used_when_error_is_not_json() {
        let err = read_reply(StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded\n").unwrap_err();

        assert!(err.to_string().ends_with(": upstream exploded"));
    }

    #[test]
    fn prediction_becomes_the_label() {
        let result = read_reply(StatusCode::OK, r#"{"prediction":"Level 4"}"#).unwrap();
        assert_eq!(result, ClassificationResult::new("Level 4"));
    }

    #[test]
    fn success_without_prediction_is_an_error() {
        assert!(read_reply(StatusCode::OK, r#"{"label":"Level 4"}"#).is_err());
    }

    #[test]
    fn report_shape() {
        let report = Report {
            crop: CropType::Tomato,
            prediction: "Healthy",
            recommendation: resolve(CropType::Tomato, "Healthy"),
        };
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["crop"], "tomato");
        assert_eq!(json["prediction"], "Healthy");
        assert_eq!(json["recommendation"]["severity"], "success");
    }
}
