use criterion::{black_box, criterion_group, criterion_main, Criterion};
use figwind_assets::AssetPipeline;
use figwind_common::Settings;
use figwind_compiler_tailwind::{CompileOptions, Compiler};
use figwind_normalizer::{MemoryHost, SceneNode};
use serde_json::{json, Value};
use std::sync::Arc;

fn card(index: usize) -> Value {
    json!({
        "id": format!("card:{}", index), "name": "Card", "type": "FRAME",
        "layoutMode": "VERTICAL", "itemSpacing": 8,
        "paddingTop": 16, "paddingRight": 16, "paddingBottom": 16, "paddingLeft": 16,
        "width": 280, "height": 160, "cornerRadius": 8,
        "fills": [{ "type": "SOLID", "color": { "r": 1, "g": 1, "b": 1 } }],
        "strokes": [{ "type": "SOLID", "color": { "r": 0.9, "g": 0.91, "b": 0.92 } }],
        "strokeWeight": 1,
        "children": [
            { "id": format!("title:{}", index), "type": "TEXT", "characters": "Card title",
              "width": 248, "height": 28,
              "textSegments": [{ "characters": "Card title", "fontSize": 20, "fontWeight": 600 }] },
            { "id": format!("body:{}", index), "type": "TEXT", "characters": "Body copy\nsecond line",
              "width": 248, "height": 40, "textAutoResize": "HEIGHT" },
            { "id": format!("cta:{}", index), "type": "FRAME", "layoutMode": "HORIZONTAL",
              "primaryAxisAlignItems": "CENTER", "counterAxisAlignItems": "CENTER",
              "width": 120, "height": 36, "cornerRadius": 6,
              "fills": [{ "type": "SOLID", "color": { "r": 0.23, "g": 0.51, "b": 0.96 } }],
              "children": [{ "id": format!("label:{}", index), "type": "TEXT",
                             "characters": "Open", "textAutoResize": "WIDTH_AND_HEIGHT" }] }
        ]
    })
}

fn grid(cards: usize) -> Vec<SceneNode> {
    let children: Vec<Value> = (0..cards).map(card).collect();
    serde_json::from_value(json!([{
        "id": "grid", "name": "Grid", "type": "FRAME",
        "layoutMode": "HORIZONTAL", "layoutWrap": "WRAP", "itemSpacing": 24,
        "width": 1200, "height": 900,
        "children": children
    }]))
    .unwrap()
}

fn compile_card_grid(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let compiler = Compiler::new(Arc::new(MemoryHost::new()), Arc::new(AssetPipeline::http()));
    let settings = Settings::default();
    let options = CompileOptions::default();

    for cards in [1, 24] {
        let roots = grid(cards);
        c.bench_function(&format!("compile_card_grid_{}", cards), |b| {
            b.iter(|| {
                runtime.block_on(compiler.compile(black_box(&roots), &settings, &options))
            })
        });
    }
}

criterion_group!(benches, compile_card_grid);
criterion_main!(benches);
