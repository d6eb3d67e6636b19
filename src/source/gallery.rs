use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::LazyLock;
use url::Url;

static LD_JSON: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"script[type="application/ld+json"]"#).expect("valid selector"));
static META: LazyLock<Selector> = LazyLock::new(|| Selector::parse("meta").expect("valid selector"));
static MEDIA: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img, source").expect("valid selector"));
static SIZE_HINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{3,4})[xX](\d{3,4})").expect("valid regex"));

const META_IMAGE_KEYS: [&str; 3] = ["og:image", "twitter:image", "og:image:url"];
const MEDIA_ATTRS: [&str; 4] = ["srcset", "data-srcset", "src", "data-src"];
const NOISE_MARKERS: [&str; 5] = ["sprite", "icon", "logo", "placeholder", "thumb"];
const IMAGE_EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".webp", ".avif"];

/// Pull candidate product image URLs out of a product page.
///
/// Sources, in order: JSON-LD `image` fields, OpenGraph/Twitter meta tags,
/// then `<img>`/`<source>` attributes. Relative URLs are resolved against
/// `page_url`; sprites, icons and other page chrome are dropped. The result
/// is de-duplicated and sorted by the `WxH` size hint in the filename,
/// largest first.
pub fn extract_image_urls(page_url: &str, html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut raw = Vec::new();

    for script in document.select(&LD_JSON) {
        let text: String = script.text().collect();
        if let Ok(data) = serde_json::from_str::<Value>(&text) {
            collect_ld_json_images(&data, &mut raw);
        }
    }

    for meta in document.select(&META) {
        let element = meta.value();
        let key = element
            .attr("property")
            .or_else(|| element.attr("name"))
            .unwrap_or_default()
            .to_lowercase();
        if META_IMAGE_KEYS.contains(&key.as_str()) {
            if let Some(content) = element.attr("content").filter(|c| !c.is_empty()) {
                raw.push(content.to_string());
            }
        }
    }

    for media in document.select(&MEDIA) {
        let element = media.value();
        for attr in MEDIA_ATTRS {
            let Some(value) = element.attr(attr).filter(|v| !v.is_empty()) else {
                continue;
            };
            if attr.contains("srcset") {
                raw.extend(srcset_urls(value));
            } else {
                raw.push(value.to_string());
            }
        }
    }

    let base = Url::parse(page_url).ok();
    let unique: BTreeSet<String> = raw
        .iter()
        .filter_map(|candidate| absolutize(base.as_ref(), candidate))
        .filter(|url| looks_like_product_image(url))
        .collect();

    let mut urls: Vec<String> = unique.into_iter().collect();
    urls.sort_by_key(|url| std::cmp::Reverse(size_hint(url)));
    urls
}

fn collect_ld_json_images(data: &Value, out: &mut Vec<String>) {
    let objects: Vec<&Value> = match data {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };
    for object in objects {
        match object.get("image") {
            Some(Value::String(url)) => out.push(url.clone()),
            Some(Value::Array(images)) => {
                out.extend(images.iter().filter_map(Value::as_str).map(str::to_string))
            }
            _ => {}
        }
    }
}

/// URL token of every `url [descriptor]` entry in a srcset.
pub fn srcset_urls(srcset: &str) -> Vec<String> {
    srcset
        .split(',')
        .filter_map(|entry| entry.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

fn absolutize(base: Option<&Url>, candidate: &str) -> Option<String> {
    let candidate = candidate.trim();
    match Url::parse(candidate) {
        Ok(url) => Some(url.to_string()),
        Err(_) => base?.join(candidate).ok().map(|url| url.to_string()),
    }
}

fn looks_like_product_image(url: &str) -> bool {
    let lower = url.to_lowercase();
    if NOISE_MARKERS.iter().any(|marker| lower.contains(marker)) {
        return false;
    }
    let path = Url::parse(url)
        .map(|parsed| parsed.path().to_lowercase())
        .unwrap_or(lower);
    IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Pixel count advertised by a `1200x900`-style token in the URL, or 0.
pub fn size_hint(url: &str) -> u64 {
    SIZE_HINT
        .captures(url)
        .and_then(|caps| {
            let width: u64 = caps[1].parse().ok()?;
            let height: u64 = caps[2].parse().ok()?;
            Some(width * height)
        })
        .unwrap_or(0)
}
