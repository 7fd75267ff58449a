//! PDF construction and text overlay on top of lopdf.
//!
//! Documents are created with one blank US Letter page. Appending text never
//! rewrites existing content: each call adds an independent content stream to
//! the target page, so repeated appends at the same coordinates stack
//! visually while every drawn string stays extractable.

use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use service_core::error::AppError;
use std::fmt::Write;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_X: f32 = 100.0;
pub const DEFAULT_Y: f32 = 700.0;
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// A single line of text to draw on a page. Defaults reproduce the service's
/// historical fixed placement: Helvetica 12 at (100, 700) on page 1.
#[derive(Debug, Clone)]
pub struct TextOverlay {
    pub text: String,
    pub page: u32,
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

impl TextOverlay {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            page: DEFAULT_PAGE,
            x: DEFAULT_X,
            y: DEFAULT_Y,
            size: DEFAULT_FONT_SIZE,
        }
    }
}

/// Serialized one-page document: catalog, page tree with count 1, one Letter
/// page with no content stream.
pub fn empty_document() -> Result<Vec<u8>, AppError> {
    let mut doc = Document::with_version("1.7");

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    });
    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => vec![Object::Reference(page_id)],
        "Count" => 1,
    });
    if let Ok(page) = doc.get_object_mut(page_id) {
        if let Ok(dict) = page.as_dict_mut() {
            dict.set("Parent", Object::Reference(pages_id));
        }
    }
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).map_err(|e| {
        AppError::InternalError(anyhow::anyhow!("Failed to serialize new document: {}", e))
    })?;
    Ok(buffer)
}

/// Load a stored document, draw `overlay.text` on the target page, and
/// return the re-serialized bytes.
pub fn overlay_text(bytes: &[u8], overlay: &TextOverlay) -> Result<Vec<u8>, AppError> {
    let mut doc = Document::load_mem(bytes).map_err(|e| {
        AppError::InternalError(anyhow::anyhow!("Failed to parse stored document: {}", e))
    })?;

    let pages = doc.get_pages();
    let page_id = *pages.get(&overlay.page).ok_or_else(|| {
        AppError::BadRequest(anyhow::anyhow!("Document has no page {}", overlay.page))
    })?;

    let font_name = ensure_helvetica(&mut doc, page_id)?;

    let mut content = String::new();
    content.push_str("BT\n");
    let _ = writeln!(content, "/{} {} Tf", font_name, overlay.size);
    let _ = writeln!(content, "{} {} Td", overlay.x, overlay.y);
    let _ = writeln!(content, "({}) Tj", escape_text(&overlay.text));
    content.push_str("ET\n");

    append_content(&mut doc, page_id, &content)?;

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).map_err(|e| {
        AppError::InternalError(anyhow::anyhow!("Failed to serialize document: {}", e))
    })?;
    Ok(buffer)
}

/// Register a Helvetica Type1 font on the page under a fresh `F<n>` name and
/// return that name. The page's Resources (and its Font dictionary) may be
/// inline or indirect; both are cloned and re-inlined on the page.
fn ensure_helvetica(doc: &mut Document, page_id: ObjectId) -> Result<String, AppError> {
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let page_dict = doc
        .get_object(page_id)
        .and_then(Object::as_dict)
        .map_err(malformed)?;

    let mut resources = match page_dict.get(b"Resources") {
        Ok(Object::Reference(id)) => doc
            .get_object(*id)
            .and_then(Object::as_dict)
            .map_err(malformed)?
            .clone(),
        Ok(Object::Dictionary(dict)) => dict.clone(),
        _ => lopdf::Dictionary::new(),
    };

    let mut fonts = match resources.get(b"Font") {
        Ok(Object::Reference(id)) => doc
            .get_object(*id)
            .and_then(Object::as_dict)
            .map_err(malformed)?
            .clone(),
        Ok(Object::Dictionary(dict)) => dict.clone(),
        _ => lopdf::Dictionary::new(),
    };

    let mut n = fonts.len() + 1;
    while fonts.has(format!("F{}", n).as_bytes()) {
        n += 1;
    }
    let font_name = format!("F{}", n);

    fonts.set(font_name.clone(), Object::Reference(font_id));
    resources.set("Font", Object::Dictionary(fonts));

    let page = doc.get_object_mut(page_id).map_err(malformed)?;
    page.as_dict_mut()
        .map_err(malformed)?
        .set("Resources", Object::Dictionary(resources));

    Ok(font_name)
}

/// Append a new content stream to the page, preserving whatever `Contents`
/// already holds (absent, single reference, or array).
fn append_content(doc: &mut Document, page_id: ObjectId, content: &str) -> Result<(), AppError> {
    let stream = Stream::new(lopdf::Dictionary::new(), content.as_bytes().to_vec());
    let content_id = doc.add_object(Object::Stream(stream));

    let page = doc.get_object_mut(page_id).map_err(malformed)?;
    let dict = page.as_dict_mut().map_err(malformed)?;

    match dict.get(b"Contents").ok().cloned() {
        Some(Object::Reference(existing)) => {
            dict.set(
                "Contents",
                Object::Array(vec![
                    Object::Reference(existing),
                    Object::Reference(content_id),
                ]),
            );
        }
        Some(Object::Array(mut arr)) => {
            arr.push(Object::Reference(content_id));
            dict.set("Contents", Object::Array(arr));
        }
        _ => {
            dict.set("Contents", Object::Reference(content_id));
        }
    }

    Ok(())
}

/// Escape the characters a PDF literal string cannot carry raw.
fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

fn malformed(e: lopdf::Error) -> AppError {
    AppError::InternalError(anyhow::anyhow!("Malformed document structure: {}", e))
}
