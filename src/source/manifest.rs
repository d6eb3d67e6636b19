use crate::error::ManifestError;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// One raw CSV row.
///
/// Headers: `mode,category,index,product_name,image_urls,product_page_url`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ManifestRow {
    pub mode: String,
    pub category: String,
    pub index: String,
    pub product_name: String,
    pub image_urls: String,
    pub product_page_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateSource {
    /// Direct image URLs, in manifest order.
    Urls(Vec<String>),
    /// A product page whose gallery gets scraped.
    Scrape(String),
}

/// A product ready to be fetched and curated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductJob {
    /// 1-based data row number, for log messages.
    pub row: usize,
    pub category: String,
    pub index: String,
    pub name: String,
    pub source: CandidateSource,
}

impl ProductJob {
    pub fn label(&self) -> String {
        format!("{}/{}", self.category, self.index)
    }
}

impl ManifestRow {
    pub fn plan(&self, row: usize) -> Result<ProductJob, ManifestError> {
        let category = self.category.trim();
        let index = self.index.trim();
        if category.is_empty() || index.is_empty() {
            return Err(ManifestError::MissingKey { row });
        }

        let mode = self.mode.trim().to_lowercase();
        let source = match mode.as_str() {
            "urls" => {
                let urls = split_urls(&self.image_urls);
                if urls.is_empty() {
                    return Err(ManifestError::NoUrls { row });
                }
                CandidateSource::Urls(urls)
            }
            "scrape" => {
                let page = self.product_page_url.trim();
                if page.is_empty() {
                    return Err(ManifestError::MissingPageUrl { row });
                }
                CandidateSource::Scrape(page.to_string())
            }
            _ => return Err(ManifestError::UnknownMode { row, mode }),
        };

        Ok(ProductJob {
            row,
            category: category.to_string(),
            index: index.to_string(),
            name: self.product_name.trim().to_string(),
            source,
        })
    }
}

/// Split a comma- or whitespace-separated URL list.
pub fn split_urls(field: &str) -> Vec<String> {
    field
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Plan every row of a manifest, keeping per-row failures so the caller can
/// skip them and move on. A CSV that cannot be opened at all is an error.
pub fn read_manifest(path: &Path) -> Result<Vec<Result<ProductJob, ManifestError>>, ManifestError> {
    let reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_path(path)?;
    Ok(plan_rows(reader))
}

pub fn parse_manifest<R: Read>(input: R) -> Vec<Result<ProductJob, ManifestError>> {
    let reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(input);
    plan_rows(reader)
}

fn plan_rows<R: Read>(mut reader: csv::Reader<R>) -> Vec<Result<ProductJob, ManifestError>> {
    reader
        .deserialize::<ManifestRow>()
        .enumerate()
        .map(|(i, record)| record.map_err(ManifestError::from)?.plan(i + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const MANIFEST: &str = "\
mode,category,index,product_name,image_urls,product_page_url
urls,LAPTOPS,1,\"Acer Swift 3\",\"https://cdn.test/front.jpg https://cdn.test/side.jpg,https://cdn.test/back.jpg\",
scrape,SMARTPHONES,2,\"Galaxy S23\",,https://shop.test/galaxy-s23/
ftp,TABLETS,3,Tab,,
urls,,4,No category,https://cdn.test/a.jpg,
scrape,AUDIO,5,Buds,,
 URLS ,AUDIO,6,Speaker,,
";

    #[test]
    fn test_split_urls() {
        assert_eq!(
            split_urls(" a.jpg,b.jpg  c.jpg,\n d.jpg ,"),
            vec!["a.jpg", "b.jpg", "c.jpg", "d.jpg"]
        );
        assert!(split_urls("  , ").is_empty());
    }

    #[test]
    fn test_parse_manifest_rows() {
        let rows = parse_manifest(MANIFEST.as_bytes());
        assert_eq!(rows.len(), 6);

        let laptop = rows[0].as_ref().unwrap();
        assert_eq!(laptop.label(), "LAPTOPS/1");
        assert_eq!(laptop.name, "Acer Swift 3");
        assert_eq!(
            laptop.source,
            CandidateSource::Urls(vec![
                "https://cdn.test/front.jpg".to_string(),
                "https://cdn.test/side.jpg".to_string(),
                "https://cdn.test/back.jpg".to_string(),
            ])
        );

        let phone = rows[1].as_ref().unwrap();
        assert_eq!(
            phone.source,
            CandidateSource::Scrape("https://shop.test/galaxy-s23/".to_string())
        );
    }

    #[test]
    fn test_bad_rows_are_reported_individually() {
        let rows = parse_manifest(MANIFEST.as_bytes());

        assert!(matches!(
            rows[2],
            Err(ManifestError::UnknownMode { row: 3, ref mode }) if mode == "ftp"
        ));
        assert!(matches!(rows[3], Err(ManifestError::MissingKey { row: 4 })));
        assert!(matches!(rows[4], Err(ManifestError::MissingPageUrl { row: 5 })));
        // Mode is case-insensitive, but the row still has no URLs.
        assert!(matches!(rows[5], Err(ManifestError::NoUrls { row: 6 })));
    }

    #[test]
    fn test_read_manifest_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("products.csv");
        fs::write(&path, MANIFEST).unwrap();

        let rows = read_manifest(&path).unwrap();
        assert_eq!(rows.iter().filter(|r| r.is_ok()).count(), 2);
    }

    #[test]
    fn test_missing_manifest_is_an_error() {
        assert!(read_manifest(Path::new("/non/existent/products.csv")).is_err());
    }
}
