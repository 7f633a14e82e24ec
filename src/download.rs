use anyhow::{anyhow, Result};
use js_sys::{Array, Uint8Array};
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

/// Hands bytes to the browser as a file download.
pub fn save_bytes(filename: &str, bytes: &[u8], mime: &str) -> Result<()> {
    let parts = Array::of1(&Uint8Array::from(bytes));
    let options = BlobPropertyBag::new();
    options.set_type(mime);

    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(|err| anyhow!("blob creation error: {err:?}"))?;
    let url = Url::create_object_url_with_blob(&blob)
        .map_err(|err| anyhow!("object url error: {err:?}"))?;

    let anchor = leptos::document()
        .create_element("a")
        .map_err(|err| anyhow!("anchor creation error: {err:?}"))?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|err| anyhow!("anchor dyn conversion error: {err:?}"))?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.click();

    Url::revoke_object_url(&url).map_err(|err| anyhow!("object url release error: {err:?}"))
}

pub fn save_json(filename: &str, value: &impl serde::Serialize) -> Result<()> {
    let json = serde_json::to_vec_pretty(value)?;
    save_bytes(filename, &json, "application/json")
}
