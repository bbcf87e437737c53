//! Pipeline integration tests: WAV file in, predictions out
//!
//! Exercises feature extraction and both classifier slots together,
//! without the HTTP layer.

use std::f32::consts::PI;
use std::path::Path;

use moodwav_web::model::{ModelOutcome, ModelStore};
use moodwav_web::pipeline::{self, PipelineError};

fn write_sine_wav(path: &Path, sample_rate: u32, seconds: f32) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    let total = (sample_rate as f32 * seconds) as u32;
    for n in 0..total {
        let t = n as f32 / sample_rate as f32;
        let sample = (0.5 * (2.0 * PI * 440.0 * t).sin() * i16::MAX as f32) as i16;
        writer.write_sample(sample).unwrap();
    }
    writer.finalize().unwrap();
}

fn write_mlp_artifact(path: &Path, class: usize) {
    let mut bias = vec![0.0f32; 8];
    bias[class] = 10.0;
    let json = serde_json::json!({
        "kind": "mlp",
        "input_dim": 40,
        "layers": [{
            "weights": vec![vec![0.0f32; 40]; 8],
            "bias": bias,
            "activation": "identity",
        }],
    });
    std::fs::write(path, json.to_string()).unwrap();
}

#[test]
fn test_run_produces_predictions_for_both_slots() {
    let models_dir = tempfile::tempdir().unwrap();
    write_mlp_artifact(&models_dir.path().join("lstm.json"), 2);
    write_mlp_artifact(&models_dir.path().join("cnn.json"), 4);
    let store = ModelStore::load(models_dir.path());

    let audio_dir = tempfile::tempdir().unwrap();
    let wav = audio_dir.path().join("clip.wav");
    write_sine_wav(&wav, 44100, 1.0);

    let predictions = pipeline::run(&store, &wav).unwrap();
    assert_eq!(predictions.lstm.wire_label(), "happy");
    assert_eq!(predictions.cnn.wire_label(), "angry");
    assert!(predictions.lstm.confidence().unwrap() > 0.99);
}

#[test]
fn test_run_is_deterministic() {
    let models_dir = tempfile::tempdir().unwrap();
    write_mlp_artifact(&models_dir.path().join("lstm.json"), 1);
    write_mlp_artifact(&models_dir.path().join("cnn.json"), 6);
    let store = ModelStore::load(models_dir.path());

    let audio_dir = tempfile::tempdir().unwrap();
    let wav = audio_dir.path().join("clip.wav");
    write_sine_wav(&wav, 44100, 0.5);

    let first = pipeline::run(&store, &wav).unwrap();
    let second = pipeline::run(&store, &wav).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_run_with_empty_store_degrades_per_slot() {
    let models_dir = tempfile::tempdir().unwrap();
    let store = ModelStore::load(models_dir.path());

    let audio_dir = tempfile::tempdir().unwrap();
    let wav = audio_dir.path().join("clip.wav");
    write_sine_wav(&wav, 44100, 0.5);

    let predictions = pipeline::run(&store, &wav).unwrap();
    assert!(matches!(predictions.lstm, ModelOutcome::Failed { .. }));
    assert!(matches!(predictions.cnn, ModelOutcome::Failed { .. }));
    // With no lstm label the video suggestion falls back to neutral
    assert_eq!(
        predictions.suggested_video(),
        "https://www.youtube.com/watch?v=kRauhbZqJCY"
    );
}

#[test]
fn test_run_fails_on_unreadable_audio() {
    let models_dir = tempfile::tempdir().unwrap();
    write_mlp_artifact(&models_dir.path().join("lstm.json"), 0);
    write_mlp_artifact(&models_dir.path().join("cnn.json"), 0);
    let store = ModelStore::load(models_dir.path());

    let audio_dir = tempfile::tempdir().unwrap();
    let bad = audio_dir.path().join("broken.wav");
    std::fs::write(&bad, b"not audio").unwrap();

    let result = pipeline::run(&store, &bad);
    assert!(matches!(result, Err(PipelineError::FeatureExtraction(_))));
}

#[test]
fn test_native_rate_wav_is_analyzed_directly() {
    let models_dir = tempfile::tempdir().unwrap();
    write_mlp_artifact(&models_dir.path().join("lstm.json"), 7);
    write_mlp_artifact(&models_dir.path().join("cnn.json"), 7);
    let store = ModelStore::load(models_dir.path());

    // WAV input skips conversion, so a 22.05 kHz file reaches the
    // extractor at its native rate
    let audio_dir = tempfile::tempdir().unwrap();
    let wav = audio_dir.path().join("clip.wav");
    write_sine_wav(&wav, 22050, 1.0);

    let predictions = pipeline::run(&store, &wav).unwrap();
    assert_eq!(predictions.lstm.wire_label(), "surprised");
}

#[test]
fn test_payload_carries_all_wire_keys() {
    let models_dir = tempfile::tempdir().unwrap();
    write_mlp_artifact(&models_dir.path().join("lstm.json"), 2);
    let store = ModelStore::load(models_dir.path());

    let audio_dir = tempfile::tempdir().unwrap();
    let wav = audio_dir.path().join("clip.wav");
    write_sine_wav(&wav, 44100, 0.5);

    let predictions = pipeline::run(&store, &wav).unwrap();
    let value = serde_json::to_value(predictions.to_payload()).unwrap();

    assert!(value["lstm_prediction"].is_string());
    assert!(value["lstm_confidence"].is_f64());
    assert_eq!(value["cnn_prediction"], "error");
    assert!(value["cnn_confidence"].is_null());
    assert!(value["suggested_video"].as_str().unwrap().starts_with("https://"));
}
