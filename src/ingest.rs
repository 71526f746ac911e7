use std::io::{Cursor, Read};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

/// Extract UTF-8 text from a source document. PDF and DOCX containers get
/// their text layers pulled; anything else is read as plain text, matching
/// the editor's upload fallback.
pub fn extract_text(path: &Path) -> Result<String> {
    let data =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let text = match ext.as_str() {
        "pdf" => extract_pdf_text(&data)
            .with_context(|| format!("Failed to extract text from {}", path.display()))?,
        "docx" => extract_docx_text(&data)
            .with_context(|| format!("Failed to extract text from {}", path.display()))?,
        _ => String::from_utf8_lossy(&data).into_owned(),
    };

    debug!("{}: extracted {} bytes of text", path.display(), text.len());
    Ok(text)
}

fn extract_pdf_text(data: &[u8]) -> Result<String> {
    let text = pdf_extract::extract_text_from_mem(data)?;
    Ok(text)
}

/// Pull paragraph text out of word/document.xml. Each <w:p> becomes one
/// line, which is what the line-based parser expects.
fn extract_docx_text(data: &[u8]) -> Result<String> {
    let cursor = Cursor::new(data);
    let mut archive = zip::ZipArchive::new(cursor).context("Not a DOCX container")?;
    let mut document = archive
        .by_name("word/document.xml")
        .context("DOCX container has no word/document.xml")?;
    let mut xml = String::new();
    document.read_to_string(&mut xml)?;

    let mut reader = quick_xml::Reader::from_str(&xml);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_paragraph = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Start(e)) => {
                if e.name().as_ref() == b"w:p" {
                    in_paragraph = true;
                    current.clear();
                }
            }
            Ok(quick_xml::events::Event::End(e)) => {
                if e.name().as_ref() == b"w:p" {
                    if !current.trim().is_empty() {
                        lines.push(current.trim().to_string());
                    }
                    in_paragraph = false;
                }
            }
            Ok(quick_xml::events::Event::Text(e)) if in_paragraph => {
                current.push_str(&e.unescape()?);
            }
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }

    Ok(lines.join("\n"))
}

// ── Tests ──
