use crate::*;
use figwind_assets::{AssetError, AssetPipeline, AssetUploader, UploadRequest};
use figwind_common::{GenerationMode, Settings};
use figwind_normalizer::{MemoryHost, NormalizeError, SceneNode};
use futures::future::{BoxFuture, FutureExt};
use serde_json::json;
use std::sync::Arc;

fn scene(value: serde_json::Value) -> Vec<SceneNode> {
    serde_json::from_value(value).unwrap()
}

/// No rounding, no variables: every value comes out verbatim
fn plain(mode: GenerationMode) -> Settings {
    let mut settings = Settings::default();
    settings.generation_mode = mode;
    settings.rounding.values = false;
    settings.rounding.colors = false;
    settings.use_color_variables = false;
    settings
}

struct StaticUploader;

impl AssetUploader for StaticUploader {
    fn upload<'a>(&'a self, request: UploadRequest<'a>) -> BoxFuture<'a, Result<String, AssetError>> {
        async move { Ok(format!("https://cdn.test/{}.{}", request.hash, request.kind.extension())) }
            .boxed()
    }
}

async fn convert_with(
    roots: &[SceneNode],
    settings: &Settings,
    host: MemoryHost,
    assets: AssetPipeline,
) -> Conversion {
    let compiler = Compiler::new(Arc::new(host), Arc::new(assets));
    match compiler
        .compile(roots, settings, &CompileOptions::default())
        .await
        .expect("Failed to compile")
    {
        CompileOutcome::Converted(conversion) => conversion,
        CompileOutcome::EmptySelection => panic!("unexpected empty selection"),
    }
}

async fn convert(roots: &[SceneNode], settings: &Settings) -> Conversion {
    convert_with(roots, settings, MemoryHost::new(), AssetPipeline::http()).await
}

fn card() -> Vec<SceneNode> {
    scene(json!([{
        "id": "1:1", "name": "Card", "type": "FRAME", "width": 200, "height": 100,
        "children": [
            { "id": "1:2", "name": "Swatch", "type": "RECTANGLE", "width": 100, "height": 50,
              "fills": [{ "type": "SOLID", "color": { "r": 1, "g": 0, "b": 0 } }] },
            { "id": "1:3", "name": "Label", "type": "TEXT", "y": 60, "width": 50, "height": 20,
              "characters": "Hello" }
        ]
    }]))
}

#[tokio::test]
async fn test_container_with_shape_and_text_jsx() {
    let conversion = convert(&card(), &plain(GenerationMode::Jsx)).await;

    println!("Generated JSX:\n{}", conversion.code);

    assert_eq!(
        conversion.code,
        "<div className=\"w-[200px] h-[100px] relative\">\n  \
         <div className=\"absolute left-0 top-0 w-[100px] h-[50px] bg-[#ff0000]\" />\n  \
         <p className=\"absolute left-0 top-[60px] w-[50px] h-[20px]\">Hello</p>\n\
         </div>"
    );
    assert!(conversion.warnings.is_empty());
}

#[tokio::test]
async fn test_container_with_shape_and_text_html() {
    let conversion = convert(&card(), &plain(GenerationMode::Html)).await;

    assert_eq!(
        conversion.code,
        "<div class=\"w-[200px] h-[100px] relative\">\n  \
         <div class=\"absolute left-0 top-0 w-[100px] h-[50px] bg-[#ff0000]\"></div>\n  \
         <p class=\"absolute left-0 top-[60px] w-[50px] h-[20px]\">Hello</p>\n\
         </div>"
    );
}

#[tokio::test]
async fn test_rounding_snaps_to_scale() {
    let roots = scene(json!([{
        "id": "1", "type": "RECTANGLE", "width": 97, "height": 47,
        "fills": [{ "type": "SOLID", "color": { "r": 0.231, "g": 0.51, "b": 0.965 } }]
    }]));
    let conversion = convert(&roots, &Settings::default()).await;

    assert_eq!(conversion.code, "<div className=\"w-24 h-12 bg-blue-500\" />");
}

#[tokio::test]
async fn test_unsupported_vector_is_a_box_with_one_warning() {
    let roots = scene(json!([{ "id": "1", "name": "Icon", "type": "VECTOR", "width": 24, "height": 24 }]));
    let conversion = convert(&roots, &Settings::default()).await;

    assert_eq!(conversion.code, "<div className=\"w-6 h-6\" />");
    assert_eq!(conversion.warnings.len(), 1);
    assert!(conversion.warnings[0].contains("Vector"));
}

#[tokio::test]
async fn test_embedded_vector_is_wrapped() {
    let roots = scene(json!([{ "id": "1", "name": "Icon", "type": "VECTOR", "width": 24, "height": 24 }]));
    let mut settings = Settings::default();
    settings.embed_vectors = true;
    let host = MemoryHost::new().with_svg("1", "<svg>\n<path d=\"M0 0\"/>\n</svg>");

    let conversion = convert_with(&roots, &settings, host, AssetPipeline::http()).await;

    assert_eq!(
        conversion.code,
        "<div data-svg-wrapper className=\"w-6 h-6\">\n  <svg>\n  <path d=\"M0 0\"/>\n  </svg>\n</div>"
    );
    assert!(conversion.warnings.is_empty());
}

#[tokio::test]
async fn test_empty_selection() {
    let compiler = Compiler::new(Arc::new(MemoryHost::new()), Arc::new(AssetPipeline::http()));
    let outcome = compiler
        .compile(&[], &Settings::default(), &CompileOptions::default())
        .await
        .unwrap();
    assert_eq!(outcome, CompileOutcome::EmptySelection);
}

#[tokio::test]
async fn test_non_finite_geometry_is_fatal() {
    let mut root = SceneNode::new("1", "FRAME");
    root.height = f64::INFINITY;
    let compiler = Compiler::new(Arc::new(MemoryHost::new()), Arc::new(AssetPipeline::http()));

    let err = compiler
        .compile(&[root], &Settings::default(), &CompileOptions::default())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        CompileError::Normalize(NormalizeError::InvalidGeometry {
            node_id: "1".to_string()
        })
    );
}

#[tokio::test]
async fn test_ignored_layers_and_instructions() {
    let roots = scene(json!([{
        "id": "1", "type": "FRAME", "width": 100, "height": 100,
        "children": [
            { "id": "2", "name": "#ignore", "type": "FRAME",
              "children": [{ "id": "3", "type": "TEXT", "characters": "secret" }] },
            { "id": "4", "name": "#prompt: render as a carousel", "type": "RECTANGLE" }
        ]
    }]));

    let conversion = convert(&roots, &Settings::default()).await;
    assert!(!conversion.code.contains("secret"));
    assert!(conversion.code.contains("{/* AI: render as a carousel */}"));
    assert!(!conversion.preview.content.contains("AI:"));

    let conversion = convert(&roots, &plain(GenerationMode::Html)).await;
    assert!(conversion.code.contains("<!-- AI: render as a carousel -->"));
}

#[tokio::test]
async fn test_slot_tags() {
    let roots = scene(json!([{
        "id": "1", "type": "FRAME", "layoutMode": "HORIZONTAL", "width": 300, "height": 100,
        "children": [
            { "id": "2", "name": "#slot:img:hero", "type": "RECTANGLE", "width": 120, "height": 80 },
            { "id": "3", "name": "#slot:badge:promo", "type": "RECTANGLE", "width": 40, "height": 20 }
        ]
    }]));

    let conversion = convert(&roots, &Settings::default()).await;
    assert!(conversion
        .code
        .contains("<SlotImage slotId=\"hero\" width={120} height={80} />"));
    assert!(conversion
        .code
        .contains("<Slot slotId=\"promo\" slotType=\"badge\" width={40} height={20} />"));

    let conversion = convert(&roots, &plain(GenerationMode::Html)).await;
    assert!(conversion.code.contains(
        "<slot-image data-slot-id=\"hero\" data-width=\"120\" data-height=\"80\"></slot-image>"
    ));
    assert!(conversion.code.contains("<slot-placeholder data-slot-id=\"promo\""));
}

#[tokio::test]
async fn test_list_and_canvas_tags() {
    let roots = scene(json!([{
        "id": "1", "name": "#list:items", "type": "FRAME", "layoutMode": "VERTICAL",
        "itemSpacing": 8, "width": 200, "height": 100,
        "children": [
            { "id": "2", "type": "RECTANGLE", "width": 200, "height": 40 },
            { "id": "3", "name": "#canvas:chart", "type": "FRAME", "width": 200, "height": 40 }
        ]
    }]));

    let conversion = convert(&roots, &plain(GenerationMode::Jsx)).await;
    assert!(conversion.code.starts_with(
        "<List listId=\"items\" direction=\"column\" gap={8} className=\"w-[200px] h-[100px] flex flex-col items-start gap-[8px]\">"
    ));
    assert!(conversion.code.contains("<canvas id=\"chart\" className=\"w-[200px] h-[40px]\" />"));
    assert!(conversion.code.ends_with("</List>"));

    let conversion = convert(&roots, &plain(GenerationMode::Html)).await;
    assert!(conversion.code.starts_with(
        "<list-container data-list-id=\"items\" data-direction=\"column\" data-gap=\"8\""
    ));
}

#[tokio::test]
async fn test_static_override_exports_whole_subtree() {
    let roots = scene(json!([{
        "id": "1", "name": "#static", "type": "FRAME", "width": 40, "height": 40,
        "children": [{ "id": "2", "type": "TEXT", "characters": "inside" }]
    }]));
    let mut settings = plain(GenerationMode::Html);
    settings.embed_images = true;
    let host = MemoryHost::new().with_png("1", vec![1, 2, 3]);

    let conversion = convert_with(&roots, &settings, host, AssetPipeline::http()).await;
    assert_eq!(
        conversion.code,
        "<img class=\"w-[40px] h-[40px]\" src=\"data:image/png;base64,AQID\" />"
    );
    assert!(!conversion.code.contains("inside"));
}

fn photo() -> Vec<SceneNode> {
    scene(json!([{
        "id": "1", "name": "Photo", "type": "RECTANGLE", "width": 100, "height": 50,
        "fills": [{ "type": "IMAGE", "imageHash": "abc" }]
    }]))
}

#[tokio::test]
async fn test_image_placeholder_in_code_real_image_in_preview() {
    let host = MemoryHost::new().with_png("1", vec![1, 2, 3]);
    let conversion = convert_with(&photo(), &plain(GenerationMode::Jsx), host, AssetPipeline::http()).await;

    assert_eq!(
        conversion.code,
        "<img className=\"w-[100px] h-[50px]\" src=\"https://placehold.co/100x50\" />"
    );
    assert_eq!(
        conversion.warnings,
        vec!["Image in \"Photo\" was replaced by a placeholder".to_string()]
    );
    assert_eq!(
        conversion.preview.content,
        "<img class=\"w-[100px] h-[50px]\" src=\"data:image/png;base64,AQID\" />"
    );
}

#[tokio::test]
async fn test_preview_option_inlines_code_images() {
    let host = MemoryHost::new().with_png("1", vec![1, 2, 3]);
    let compiler = Compiler::new(Arc::new(host), Arc::new(AssetPipeline::http()));
    let options = CompileOptions {
        is_preview: true,
        trigger_type: Some("selection".to_string()),
    };

    let outcome = compiler
        .compile(&photo(), &plain(GenerationMode::Jsx), &options)
        .await
        .unwrap();
    let CompileOutcome::Converted(conversion) = outcome else {
        panic!("expected a conversion");
    };
    assert!(conversion.code.contains("src=\"data:image/png;base64,AQID\""));
    assert!(conversion.warnings.is_empty());
    assert_eq!(conversion.trigger_type.as_deref(), Some("selection"));
}

#[tokio::test]
async fn test_preview_option_skips_uploads() {
    let mut settings = plain(GenerationMode::Jsx);
    settings.asset_upload.enabled = true;
    let host = MemoryHost::new().with_png("1", vec![1, 2, 3]);
    let assets = Arc::new(AssetPipeline::new(Arc::new(StaticUploader)));
    let compiler = Compiler::new(Arc::new(host), assets.clone());
    let options = CompileOptions {
        is_preview: true,
        trigger_type: None,
    };

    let CompileOutcome::Converted(conversion) =
        compiler.compile(&photo(), &settings, &options).await.unwrap()
    else {
        panic!("expected a conversion");
    };
    assert_eq!(
        conversion.code,
        "<img className=\"w-[100px] h-[50px]\" src=\"data:image/png;base64,AQID\" />"
    );
    assert!(conversion.warnings.is_empty());
    assert!(assets.cache().is_empty());
}

#[tokio::test]
async fn test_uploaded_images_use_remote_urls() {
    let mut settings = plain(GenerationMode::Jsx);
    settings.asset_upload.enabled = true;
    let host = MemoryHost::new().with_png("1", vec![1, 2, 3]);

    let conversion =
        convert_with(&photo(), &settings, host, AssetPipeline::new(Arc::new(StaticUploader))).await;
    assert!(conversion.code.contains("src=\"https://cdn.test/"));
    assert!(conversion.code.contains(".png\""));
    assert!(conversion.warnings.is_empty());
}

#[tokio::test]
async fn test_container_image_fill_becomes_background() {
    let roots = scene(json!([{
        "id": "1", "name": "Hero", "type": "FRAME", "layoutMode": "VERTICAL",
        "width": 100, "height": 50,
        "fills": [{ "type": "IMAGE" }],
        "children": [{ "id": "2", "type": "TEXT", "characters": "Title", "textAutoResize": "WIDTH_AND_HEIGHT" }]
    }]));

    let mut settings = plain(GenerationMode::Jsx);
    settings.asset_upload.enabled = true;
    let host = MemoryHost::new().with_png("1", vec![1, 2, 3]);
    let conversion =
        convert_with(&roots, &settings, host, AssetPipeline::new(Arc::new(StaticUploader))).await;
    assert!(conversion.code.contains("bg-[url(https://cdn.test/"));
    assert!(conversion.code.contains("bg-cover"));

    let mut settings = plain(GenerationMode::Jsx);
    settings.embed_images = true;
    let host = MemoryHost::new().with_png("1", vec![1, 2, 3]);
    let conversion = convert_with(&roots, &settings, host, AssetPipeline::http()).await;
    assert!(conversion
        .code
        .contains("style={{backgroundImage: \"url(data:image/png;base64,AQID)\"}}"));
}

#[tokio::test]
async fn test_duplicate_warnings_are_reported_once() {
    let roots = scene(json!([
        { "id": "1", "name": "Photo", "type": "RECTANGLE", "width": 10, "height": 10,
          "fills": [{ "type": "IMAGE" }] },
        { "id": "2", "name": "Photo", "type": "RECTANGLE", "width": 10, "height": 10,
          "fills": [{ "type": "IMAGE" }] }
    ]));
    let conversion = convert(&roots, &Settings::default()).await;
    assert_eq!(conversion.warnings.len(), 1);
}

#[tokio::test]
async fn test_zero_height_group_emits_children_only() {
    let roots = scene(json!([{
        "id": "1", "type": "GROUP", "width": 100, "height": 0,
        "children": [{ "id": "2", "type": "TEXT", "characters": "Loose",
                       "textAutoResize": "WIDTH_AND_HEIGHT" }]
    }]));
    let conversion = convert(&roots, &Settings::default()).await;
    assert_eq!(conversion.code, "<p className=\"absolute left-0 top-0\">Loose</p>");
}

#[tokio::test]
async fn test_negative_width_frame_emits_children_only() {
    let roots = scene(json!([{
        "id": "1", "type": "FRAME", "width": -1, "height": 40,
        "children": [{ "id": "2", "type": "TEXT", "characters": "Loose",
                       "textAutoResize": "WIDTH_AND_HEIGHT" }]
    }]));
    let conversion = convert(&roots, &Settings::default()).await;
    assert_eq!(conversion.code, "<p className=\"absolute left-0 top-0\">Loose</p>");
}

#[tokio::test]
async fn test_styled_text_segments() {
    let roots = scene(json!([{
        "id": "1", "type": "TEXT", "characters": "Hello world",
        "textAutoResize": "WIDTH_AND_HEIGHT",
        "textSegments": [
            { "characters": "Hello " },
            { "characters": "world", "fontWeight": 700 }
        ]
    }]));
    let conversion = convert(&roots, &Settings::default()).await;

    assert_eq!(
        conversion.code,
        "<p><span>Hello </span><span className=\"font-bold\">world</span></p>"
    );
    assert_eq!(conversion.text_styles.len(), 2);
    assert_eq!(conversion.text_styles[1].classes, vec!["font-bold".to_string()]);
    assert_eq!(
        render_text_styles(&conversion.text_styles),
        "// Hello\n---\n// world\nfont-bold"
    );
}

#[tokio::test]
async fn test_text_is_escaped() {
    let roots = scene(json!([{
        "id": "1", "type": "TEXT", "characters": "a < {b}\nc",
        "textAutoResize": "WIDTH_AND_HEIGHT"
    }]));
    let conversion = convert(&roots, &Settings::default()).await;
    assert_eq!(conversion.code, "<p>a &lt; &#123;b&#125;<br/>c</p>");
}

#[tokio::test]
async fn test_prefix_and_layer_names_only_in_code() {
    let mut settings = plain(GenerationMode::Jsx);
    settings.custom_class_prefix = "tw-".to_string();
    settings.show_layer_names = true;

    let conversion = convert(&card(), &settings).await;
    assert!(conversion
        .code
        .starts_with("<div data-layer=\"Card\" className=\"tw-w-[200px] tw-h-[100px] tw-relative\">"));
    assert!(conversion
        .preview
        .content
        .starts_with("<div class=\"w-[200px] h-[100px] relative\">"));
    assert!(!conversion.preview.content.contains("data-layer"));
}

#[tokio::test]
async fn test_preview_size_covers_all_roots() {
    let roots = scene(json!([
        { "id": "1", "type": "RECTANGLE", "width": 100, "height": 50 },
        { "id": "2", "type": "RECTANGLE", "x": 150, "y": 20, "width": 50, "height": 100 }
    ]));
    let conversion = convert(&roots, &Settings::default()).await;
    assert_eq!(
        conversion.preview.size,
        PreviewSize {
            width: 200.0,
            height: 120.0
        }
    );
}

#[tokio::test]
async fn test_conversion_is_deterministic() {
    let settings = Settings::default();
    let first = convert(&card(), &settings).await;
    let second = convert(&card(), &settings).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_colors_report() {
    let conversion = convert(&card(), &plain(GenerationMode::Jsx)).await;

    assert_eq!(conversion.colors.len(), 1);
    let red = &conversion.colors[0];
    assert_eq!(red.hex, "#FF0000");
    assert_eq!(red.token, "[#ff0000]");
    assert_eq!(red.contrast_white, 4.0);
    assert_eq!(red.contrast_black, 5.25);
}

#[tokio::test]
async fn test_conversion_serializes_camel_case() {
    let conversion = convert(&card(), &Settings::default()).await;
    let value = serde_json::to_value(&conversion).unwrap();
    assert!(value.get("textStyles").is_some());
    assert!(value["preview"]["size"].get("width").is_some());
    assert!(value.get("triggerType").is_none());
}
