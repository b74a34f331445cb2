//! End-to-end conversions through the public API

use figwind_assets::{AssetError, AssetPipeline, AssetUploader, UploadRequest};
use figwind_common::Settings;
use figwind_compiler_tailwind::{CompileOptions, CompileOutcome, Compiler, Conversion};
use figwind_normalizer::{MemoryHost, SceneNode};
use futures::future::{BoxFuture, FutureExt};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Records how many uploads overlap
#[derive(Default)]
struct TrackingUploader {
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl AssetUploader for TrackingUploader {
    fn upload<'a>(&'a self, request: UploadRequest<'a>) -> BoxFuture<'a, Result<String, AssetError>> {
        async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(format!("https://cdn.test/{}.{}", request.hash, request.kind.extension()))
        }
        .boxed()
    }
}

fn gallery(count: usize) -> (Vec<SceneNode>, MemoryHost) {
    let mut host = MemoryHost::new();
    let mut children = Vec::new();
    for i in 0..count {
        let id = format!("2:{}", i);
        host = host.with_png(id.clone(), vec![i as u8, 7, 7]);
        children.push(json!({
            "id": id, "name": format!("Photo {}", i), "type": "RECTANGLE",
            "width": 64, "height": 64,
            "fills": [{ "type": "IMAGE", "imageHash": format!("h{}", i) }]
        }));
    }
    let roots = serde_json::from_value(json!([{
        "id": "1:1", "name": "Gallery", "type": "FRAME",
        "layoutMode": "HORIZONTAL", "layoutWrap": "WRAP", "itemSpacing": 16,
        "width": 640, "height": 400,
        "children": children
    }]))
    .unwrap();
    (roots, host)
}

fn upload_settings(max_concurrent: usize) -> Settings {
    Settings::from_json_str(&format!(
        r#"{{
            "generationMode": "html",
            "assetUpload": {{ "enabled": true, "maxConcurrentUploads": {} }}
        }}"#,
        max_concurrent
    ))
    .unwrap()
}

async fn converted(compiler: &Compiler, roots: &[SceneNode], settings: &Settings) -> Conversion {
    match compiler
        .compile(roots, settings, &CompileOptions::default())
        .await
        .expect("Failed to compile")
    {
        CompileOutcome::Converted(conversion) => conversion,
        CompileOutcome::EmptySelection => panic!("unexpected empty selection"),
    }
}

#[tokio::test]
async fn test_uploads_respect_concurrency_limit() {
    let (roots, host) = gallery(8);
    let uploader = Arc::new(TrackingUploader::default());
    let compiler = Compiler::new(
        Arc::new(host),
        Arc::new(AssetPipeline::new(uploader.clone())),
    );

    let conversion = converted(&compiler, &roots, &upload_settings(2)).await;

    println!("Generated HTML:\n{}", conversion.code);

    assert_eq!(uploader.calls.load(Ordering::SeqCst), 8);
    assert!(uploader.peak.load(Ordering::SeqCst) <= 2);
    assert_eq!(conversion.code.matches("src=\"https://cdn.test/").count(), 8);
    assert!(conversion.warnings.is_empty());
}

#[tokio::test]
async fn test_repeated_conversions_reuse_uploads() {
    let (roots, host) = gallery(3);
    let uploader = Arc::new(TrackingUploader::default());
    let compiler = Compiler::new(
        Arc::new(host),
        Arc::new(AssetPipeline::new(uploader.clone())),
    );
    let settings = upload_settings(5);

    let first = converted(&compiler, &roots, &settings).await;
    let second = converted(&compiler, &roots, &settings).await;

    assert_eq!(first.code, second.code);
    assert_eq!(uploader.calls.load(Ordering::SeqCst), 3);
    assert_eq!(compiler.assets().cache().len(), 3);
}

#[tokio::test]
async fn test_wrapping_gallery_layout() {
    let (roots, host) = gallery(2);
    let compiler = Compiler::new(Arc::new(host), Arc::new(AssetPipeline::http()));

    let conversion = converted(&compiler, &roots, &Settings::default()).await;

    assert!(conversion
        .code
        .starts_with("<div className=\"w-[640px] h-96 flex flex-wrap items-start gap-4\">"));
    assert_eq!(conversion.warnings.len(), 2);
    assert!(conversion.preview.content.contains("data:image/png;base64,"));
}

#[tokio::test]
async fn test_color_variables_name_tokens() {
    let roots: Vec<SceneNode> = serde_json::from_value(json!([{
        "id": "1", "type": "RECTANGLE", "width": 32, "height": 32,
        "fills": [{
            "type": "SOLID", "color": { "r": 0.2, "g": 0.4, "b": 0.8 },
            "boundVariables": { "color": { "id": "VariableID:1" } }
        }]
    }]))
    .unwrap();
    let host = MemoryHost::new().with_variable("VariableID:1", "Brand/Primary");
    let compiler = Compiler::new(Arc::new(host), Arc::new(AssetPipeline::http()));

    let conversion = converted(&compiler, &roots, &Settings::default()).await;

    assert_eq!(conversion.code, "<div className=\"w-8 h-8 bg-brand-primary\" />");
    assert_eq!(conversion.colors[0].token, "brand-primary");
}
