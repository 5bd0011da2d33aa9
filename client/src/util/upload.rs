//! Reading user-picked files into memory for multipart uploads.

#[cfg(test)]
#[path = "upload_test.rs"]
mod upload_test;

use crate::net::types::FileUpload;

const FALLBACK_MIME: &str = "application/octet-stream";

/// Largest upload accepted before a request is attempted.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Browser-reported type, or a generic binary type when it is blank.
pub fn mime_or_default(reported: &str) -> String {
    let reported = reported.trim();
    if reported.is_empty() { FALLBACK_MIME.to_owned() } else { reported.to_owned() }
}

/// Check size and type before upload.
///
/// # Errors
///
/// Returns a user-facing message when the file is empty, too large, or not
/// an image.
pub fn validate_image(file: &FileUpload) -> Result<(), String> {
    if file.bytes.is_empty() {
        return Err("The selected file is empty.".to_owned());
    }
    if file.bytes.len() > MAX_UPLOAD_BYTES {
        return Err("Images must be 10 MB or smaller.".to_owned());
    }
    if !file.mime.starts_with("image/") {
        return Err("Choose an image file.".to_owned());
    }
    Ok(())
}

/// Read the first file selected in `input`.
#[cfg(feature = "hydrate")]
pub async fn read_input_file(input: &web_sys::HtmlInputElement) -> Option<FileUpload> {
    let file = input.files()?.get(0)?;
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer()).await.ok()?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Some(FileUpload { file_name: file.name(), mime: mime_or_default(&file.type_()), bytes })
}
