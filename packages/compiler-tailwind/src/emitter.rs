//! Intermediate tree to markup.
//!
//! Nodes are visited depth-first. Siblings are emitted concurrently and
//! joined in declaration order. Emission never fails: export and upload
//! problems degrade to placeholders plus a warning.

use crate::markup::{comment, escape_text, Element};
use crate::report::TextStyleEntry;
use crate::resolve::color::resolve_background;
use crate::resolve::layout::{
    has_absolute_children, resolve_auto_layout, resolve_position, resolve_size, ParentContext,
};
use crate::resolve::shape::{resolve_corners, resolve_effects, resolve_stroke};
use crate::resolve::typography::{resolve_alignment, resolve_run, segments};
use crate::resolve::StyleResolution;
use figwind_assets::{placeholder_image_url, to_data_uri, AssetKind, AssetPipeline};
use figwind_common::{format_number, GenerationMode, Settings};
use figwind_normalizer::{
    Artifact, DesignHost, IrNode, LayoutDirection, NodeKind, SlotKind, SpecialTag, TextContent,
};
use futures::future::{join_all, BoxFuture, FutureExt};
use tracing::debug;

/// Output of one subtree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub markup: String,
    pub warnings: Vec<String>,
    pub text_styles: Vec<TextStyleEntry>,
}

impl Fragment {
    fn markup(markup: String) -> Self {
        Self {
            markup,
            ..Default::default()
        }
    }

    fn warning(message: String) -> Self {
        Self {
            warnings: vec![message],
            ..Default::default()
        }
    }

    /// Concatenate in order
    pub fn join(fragments: Vec<Fragment>) -> Fragment {
        let mut joined = Fragment::default();
        for fragment in fragments {
            joined.markup.push_str(&fragment.markup);
            joined.warnings.extend(fragment.warnings);
            joined.text_styles.extend(fragment.text_styles);
        }
        joined
    }
}

/// Where an image ended up
#[derive(Debug, Clone, PartialEq)]
enum ImageSource {
    Url(String),
    DataUri(String),
}

impl ImageSource {
    fn as_str(&self) -> &str {
        match self {
            ImageSource::Url(url) | ImageSource::DataUri(url) => url,
        }
    }
}

/// How bitmap fills are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMode {
    /// Upload, then embed, then placeholder, as configured
    Code,
    /// Inline as data URIs without uploading; placeholder when the export fails
    Inline,
    /// Inline as data URIs and never fall back to placeholders
    Preview,
}

pub struct Emitter<'a> {
    settings: &'a Settings,
    host: &'a dyn DesignHost,
    assets: &'a AssetPipeline,
    images: ImageMode,
}

impl<'a> Emitter<'a> {
    pub fn new(
        settings: &'a Settings,
        host: &'a dyn DesignHost,
        assets: &'a AssetPipeline,
        images: ImageMode,
    ) -> Self {
        Self {
            settings,
            host,
            assets,
            images,
        }
    }

    fn mode(&self) -> GenerationMode {
        self.settings.generation_mode
    }

    /// Emit selection roots. The result keeps its leading newline.
    pub async fn emit(&self, roots: &[IrNode]) -> Fragment {
        let fragments = join_all(
            roots
                .iter()
                .map(|root| self.emit_node(root, ParentContext::root())),
        )
        .await;
        Fragment::join(fragments)
    }

    async fn emit_children(&self, node: &IrNode) -> Fragment {
        let context = ParentContext::of(node);
        let fragments = join_all(
            node.children
                .iter()
                .map(|child| self.emit_node(child, context)),
        )
        .await;
        Fragment::join(fragments)
    }

    fn emit_node<'b>(&'b self, node: &'b IrNode, parent: ParentContext<'b>) -> BoxFuture<'b, Fragment> {
        async move {
            match &node.tag {
                SpecialTag::Ignore => Fragment::default(),
                SpecialTag::AiInstruction { instruction } => {
                    Fragment::markup(comment(&format!("AI: {}", instruction), self.mode()))
                }
                SpecialTag::Slot { kind, subtype, id } => self.slot(node, *kind, subtype, id, parent),
                SpecialTag::List { id } => self.list(node, id, parent).await,
                SpecialTag::Canvas { id } => self.canvas(node, id, parent),
                SpecialTag::StaticOverride => self.static_image(node, parent).await,
                SpecialTag::None => self.emit_kind(node, parent).await,
            }
        }
        .boxed()
    }

    async fn emit_kind(&self, node: &IrNode, parent: ParentContext<'_>) -> Fragment {
        if let Some(artifact) = &node.artifact {
            return self.vector_artifact(node, artifact, parent);
        }

        match &node.kind {
            NodeKind::Rectangle | NodeKind::Ellipse => self.shape(node, parent).await,
            NodeKind::Group | NodeKind::Frame | NodeKind::Section => {
                self.container(node, parent).await
            }
            NodeKind::Text(content) => self.text(node, content, parent),
            NodeKind::Line => {
                let mut style = self.base_style(node, parent);
                resolve_stroke(node, self.settings, &mut style);
                Fragment::markup(self.element("div", node, &style).render(self.mode()))
            }
            NodeKind::Vector => self.vector_fallback(node, parent),
            NodeKind::Unsupported(native) => Fragment::warning(format!(
                "Unsupported node type {} on layer \"{}\" was skipped",
                native, node.name
            )),
        }
    }

    /// Position, size and effects shared by every element
    fn base_style(&self, node: &IrNode, parent: ParentContext<'_>) -> StyleResolution {
        let mut style = StyleResolution::new(self.settings);
        resolve_position(node, parent, self.settings, &mut style);
        resolve_size(node, parent, self.settings, &mut style);
        resolve_effects(node, self.settings, &mut style);
        style
    }

    /// Paint: background, corners and border
    fn paint_style(&self, node: &IrNode, style: &mut StyleResolution) {
        resolve_background(&node.style.fills, self.settings, style);
        resolve_corners(node, self.settings, style);
        resolve_stroke(node, self.settings, style);
    }

    fn element(&self, tag: &str, node: &IrNode, style: &StyleResolution) -> Element {
        self.decorate(Element::new(tag), node, style)
    }

    /// Layer name and style attributes
    fn decorate(&self, element: Element, node: &IrNode, style: &StyleResolution) -> Element {
        let element = if self.settings.show_layer_names {
            element.attr("data-layer", node.name.as_str())
        } else {
            element
        };
        element.styled(style, self.mode())
    }

    async fn shape(&self, node: &IrNode, parent: ParentContext<'_>) -> Fragment {
        if node.geometry.width <= 0.0 {
            return Fragment::default();
        }

        let mut style = self.base_style(node, parent);
        self.paint_style(node, &mut style);

        let mut fragment = Fragment::default();
        let element = if node.style.has_image_fill() {
            match self.image(node, false, &mut fragment.warnings).await {
                Some(source) => self.element("img", node, &style).attr("src", source.as_str()),
                None => self.element("div", node, &style),
            }
        } else {
            self.element("div", node, &style)
        };
        fragment.markup = element.render(self.mode());
        fragment
    }

    async fn container(&self, node: &IrNode, parent: ParentContext<'_>) -> Fragment {
        let mut fragment = self.emit_children(node).await;
        let skip = if matches!(node.kind, NodeKind::Group) {
            node.geometry.width < 0.0 || node.geometry.height <= 0.0
        } else {
            node.geometry.width < 0.0 || node.geometry.height < 0.0
        };
        if skip {
            return fragment;
        }

        let mut style = self.base_style(node, parent);
        if let Some(layout) = &node.layout {
            resolve_auto_layout(layout, self.settings, &mut style);
        }
        if has_absolute_children(node) {
            style.add("relative");
        }
        self.paint_style(node, &mut style);

        if node.style.has_image_fill() {
            match self.image(node, true, &mut fragment.warnings).await {
                Some(ImageSource::Url(url)) => {
                    style.add(format!("bg-[url({})]", url));
                    style.add("bg-cover");
                }
                Some(ImageSource::DataUri(uri)) => {
                    style.add_style("background-image", format!("url({})", uri));
                    style.add("bg-cover");
                }
                None => {}
            }
        }

        if style.is_empty() && !self.settings.show_layer_names {
            return fragment;
        }
        let element = self.element("div", node, &style);
        let element = if fragment.markup.is_empty() {
            element
        } else {
            element.children(vec![std::mem::take(&mut fragment.markup)])
        };
        fragment.markup = element.render(self.mode());
        fragment
    }

    fn text(&self, node: &IrNode, content: &TextContent, parent: ParentContext<'_>) -> Fragment {
        let mode = self.mode();
        let mut style = self.base_style(node, parent);
        resolve_alignment(content, &mut style);

        let mut fragment = Fragment::default();
        let segments = segments(content);
        let inline = match segments.as_slice() {
            [] => String::new(),
            [only] => {
                resolve_run(only.style, self.settings, &mut style);
                let mut run = StyleResolution::new(self.settings);
                resolve_run(only.style, self.settings, &mut run);
                fragment.text_styles.push(TextStyleEntry {
                    text: only.text.clone(),
                    classes: run.classes().to_vec(),
                });
                escape_text(&only.text, mode)
            }
            many => many
                .iter()
                .map(|segment| {
                    let mut run = StyleResolution::new(self.settings);
                    resolve_run(segment.style, self.settings, &mut run);
                    fragment.text_styles.push(TextStyleEntry {
                        text: segment.text.clone(),
                        classes: run.classes().to_vec(),
                    });

                    let text = escape_text(&segment.text, mode);
                    let tag = if segment.style.subscript {
                        "sub"
                    } else if segment.style.superscript {
                        "sup"
                    } else {
                        "span"
                    };
                    Element::new(tag)
                        .styled(&run, mode)
                        .inline(text)
                        .render(mode)
                        .trim_start_matches('\n')
                        .to_string()
                })
                .collect(),
        };

        fragment.markup = self.element("p", node, &style).inline(inline).render(mode);
        fragment
    }

    fn vector_artifact(
        &self,
        node: &IrNode,
        artifact: &Artifact,
        parent: ParentContext<'_>,
    ) -> Fragment {
        let style = self.base_style(node, parent);
        let element = match artifact {
            Artifact::Svg(svg) => self
                .decorate(Element::new("div").flag("data-svg-wrapper"), node, &style)
                .block(svg.as_str()),
            Artifact::Remote { url } => self.element("img", node, &style).attr("src", url.as_str()),
        };
        Fragment::markup(element.render(self.mode()))
    }

    /// A vector without an artifact is drawn as a plain box
    fn vector_fallback(&self, node: &IrNode, parent: ParentContext<'_>) -> Fragment {
        let warning = if self.settings.embed_vectors {
            format!("Vector \"{}\" could not be exported and was drawn as a box", node.name)
        } else {
            format!(
                "Vector nodes are not supported without embedVectors; \"{}\" was drawn as a box",
                node.name
            )
        };
        let mut style = self.base_style(node, parent);
        self.paint_style(node, &mut style);
        Fragment {
            markup: self.element("div", node, &style).render(self.mode()),
            warnings: vec![warning],
            text_styles: Vec::new(),
        }
    }

    fn slot(
        &self,
        node: &IrNode,
        kind: SlotKind,
        subtype: &str,
        id: &str,
        parent: ParentContext<'_>,
    ) -> Fragment {
        let width = format_number(node.geometry.width.round());
        let height = format_number(node.geometry.height.round());
        let mut position = StyleResolution::new(self.settings);
        resolve_position(node, parent, self.settings, &mut position);

        let mode = self.mode();
        let suffix = kind.component_suffix();
        let element = if mode.is_jsx() {
            let element = Element::new(format!("Slot{}", suffix)).attr("slotId", id);
            let element = if kind == SlotKind::Generic {
                element.attr("slotType", subtype)
            } else {
                element
            };
            element.expr("width", width).expr("height", height)
        } else {
            let tag = match kind {
                SlotKind::Generic => "slot-placeholder".to_string(),
                _ => format!("slot-{}", suffix.to_ascii_lowercase()),
            };
            let element = Element::new(tag).attr("data-slot-id", id);
            let element = if kind == SlotKind::Generic {
                element.attr("data-slot-type", subtype)
            } else {
                element
            };
            element.attr("data-width", width).attr("data-height", height)
        };
        Fragment::markup(element.styled(&position, mode).render(mode))
    }

    async fn list(&self, node: &IrNode, id: &str, parent: ParentContext<'_>) -> Fragment {
        let mut fragment = self.emit_children(node).await;

        let (direction, gap) = match &node.layout {
            Some(layout) if layout.direction == LayoutDirection::Row => ("row", layout.gap),
            Some(layout) => ("column", layout.gap),
            None => ("column", 0.0),
        };
        let gap = format_number(gap);

        let mut style = self.base_style(node, parent);
        if let Some(layout) = &node.layout {
            resolve_auto_layout(layout, self.settings, &mut style);
        }
        if has_absolute_children(node) {
            style.add("relative");
        }
        self.paint_style(node, &mut style);

        let mode = self.mode();
        let element = if mode.is_jsx() {
            Element::new("List")
                .attr("listId", id)
                .attr("direction", direction)
                .expr("gap", gap)
        } else {
            Element::new("list-container")
                .attr("data-list-id", id)
                .attr("data-direction", direction)
                .attr("data-gap", gap)
        };
        let element = element.styled(&style, mode);
        let element = if fragment.markup.is_empty() {
            element
        } else {
            element.children(vec![std::mem::take(&mut fragment.markup)])
        };
        fragment.markup = element.render(mode);
        fragment
    }

    fn canvas(&self, node: &IrNode, id: &str, parent: ParentContext<'_>) -> Fragment {
        let style = self.base_style(node, parent);
        let element = Element::new("canvas").attr("id", id).styled(&style, self.mode());
        Fragment::markup(element.render(self.mode()))
    }

    /// The whole subtree as one image
    async fn static_image(&self, node: &IrNode, parent: ParentContext<'_>) -> Fragment {
        let style = self.base_style(node, parent);
        let mut fragment = Fragment::default();
        let element = match self.image(node, false, &mut fragment.warnings).await {
            Some(source) => self.element("img", node, &style).attr("src", source.as_str()),
            None => self.element("div", node, &style),
        };
        fragment.markup = element.render(self.mode());
        fragment
    }

    /// Resolve a node's bitmap.
    ///
    /// Preview: inline data URI, or nothing. Code: upload, then inline when
    /// `embedImages` is on, then a placeholder with a warning.
    async fn image(
        &self,
        node: &IrNode,
        exclude_children: bool,
        warnings: &mut Vec<String>,
    ) -> Option<ImageSource> {
        if self.images == ImageMode::Preview {
            let bytes = node.bitmap(self.host, exclude_children).await;
            if bytes.is_none() {
                debug!(node_id = %node.id, "Preview image unavailable");
            }
            return bytes.map(|b| ImageSource::DataUri(to_data_uri(&b, AssetKind::Png)));
        }

        let upload = &self.settings.asset_upload;
        let inline = self.images == ImageMode::Inline;
        if !inline && upload.uploads_bitmaps() {
            if let Some(bytes) = node.bitmap(self.host, exclude_children).await {
                if let Some(url) = self.assets.get_or_upload(&bytes, AssetKind::Png, upload).await {
                    return Some(ImageSource::Url(url));
                }
            }
        }
        if inline || self.settings.embed_images {
            if let Some(bytes) = node.bitmap(self.host, exclude_children).await {
                return Some(ImageSource::DataUri(to_data_uri(&bytes, AssetKind::Png)));
            }
        }

        warnings.push(format!(
            "Image in \"{}\" was replaced by a placeholder",
            node.name
        ));
        Some(ImageSource::Url(placeholder_image_url(
            node.geometry.width,
            node.geometry.height,
        )))
    }
}
