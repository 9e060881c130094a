//! Boundary document loading
//!
//! The boundary document (`primary_area.xml`) lists every forecast
//! subdivision as `city` elements nested under `pref` elements:
//!
//! ```xml
//! <pref title="神奈川県">
//!   <warn title="神奈川県" source="..."/>
//!   <city title="横浜" id="140010" source="..."/>
//!   <city title="小田原" id="140020" source="..."/>
//! </pref>
//! ```

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, info, warn};

use crate::http::{ACCEPT_XML, HttpFetcher};
use crate::{ForecastError, Result};

/// City title to region code (or `None` when no code is assigned)
pub type CityCodes = HashMap<String, Option<String>>;

/// Two-level lookup table: prefecture title → city title → region code
///
/// City titles are scoped to their prefecture. The same city title may
/// appear under several prefectures without colliding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundaryIndex {
    prefectures: HashMap<String, CityCodes>,
}

impl BoundaryIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a boundary document into an index
    ///
    /// Every `pref` element at any depth becomes a key; its immediate `city`
    /// children become entries. Elements without a `title` are skipped.
    /// Several `pref` elements sharing a title merge into one scope.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut index = Self::new();
        let mut scopes: Vec<PrefScope> = Vec::new();
        let mut depth = 0usize;

        loop {
            let event = reader.read_event().map_err(|e| {
                ForecastError::parse(format!(
                    "Malformed boundary XML at position {}: {e}",
                    reader.error_position()
                ))
            })?;

            match event {
                Event::Start(element) => {
                    depth += 1;
                    if let Some(scope) =
                        index.visit(&element, depth, scopes.last(), reader.decoder())?
                    {
                        scopes.push(scope);
                    }
                }
                Event::Empty(element) => {
                    // Self-closing: visited one level down, never opens a scope
                    index.visit(&element, depth + 1, scopes.last(), reader.decoder())?;
                }
                Event::End(_) => {
                    if scopes.last().is_some_and(|scope| scope.depth == depth) {
                        scopes.pop();
                    }
                    depth = depth.saturating_sub(1);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if depth != 0 {
            return Err(ForecastError::parse(format!(
                "Boundary XML ended with {depth} unclosed element(s)"
            )));
        }

        Ok(index)
    }

    /// Record one element; returns the scope it opens when it is a `pref`
    fn visit(
        &mut self,
        element: &BytesStart<'_>,
        depth: usize,
        parent: Option<&PrefScope>,
        decoder: Decoder,
    ) -> Result<Option<PrefScope>> {
        match element.local_name().as_ref() {
            b"pref" => {
                let title = non_empty_attribute(element, "title", decoder)?;
                match &title {
                    Some(title) => self.insert_prefecture(title.clone()),
                    None => debug!("Skipping pref element without title"),
                }
                Ok(Some(PrefScope { depth, title }))
            }
            b"city" => {
                let Some(PrefScope {
                    depth: pref_depth,
                    title: Some(pref),
                }) = parent
                else {
                    return Ok(None);
                };
                if *pref_depth + 1 != depth {
                    return Ok(None);
                }

                match non_empty_attribute(element, "title", decoder)? {
                    Some(city) => {
                        let code = non_empty_attribute(element, "id", decoder)?;
                        self.insert_city(pref, city, code);
                    }
                    None => debug!("Skipping city element without title in {}", pref),
                }
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    /// Ensure a prefecture scope exists
    pub fn insert_prefecture<S: Into<String>>(&mut self, pref: S) {
        self.prefectures.entry(pref.into()).or_default();
    }

    /// Insert or replace a city entry, creating the prefecture if needed
    pub fn insert_city<P: Into<String>, C: Into<String>>(
        &mut self,
        pref: P,
        city: C,
        code: Option<String>,
    ) {
        self.prefectures
            .entry(pref.into())
            .or_default()
            .insert(city.into(), code);
    }

    /// Cities recorded under the given prefecture title
    #[must_use]
    pub fn prefecture(&self, pref: &str) -> Option<&CityCodes> {
        self.prefectures.get(pref)
    }

    /// Number of prefecture scopes
    #[must_use]
    pub fn len(&self) -> usize {
        self.prefectures.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prefectures.is_empty()
    }

    /// Number of city entries across every prefecture
    #[must_use]
    pub fn city_count(&self) -> usize {
        self.prefectures.values().map(HashMap::len).sum()
    }
}

#[derive(Debug)]
struct PrefScope {
    depth: usize,
    title: Option<String>,
}

fn non_empty_attribute(
    element: &BytesStart<'_>,
    name: &str,
    decoder: Decoder,
) -> Result<Option<String>> {
    let attribute = element
        .try_get_attribute(name)
        .map_err(|e| ForecastError::parse(format!("Invalid attribute '{name}': {e}")))?;

    let Some(attribute) = attribute else {
        return Ok(None);
    };

    let value = attribute
        .decode_and_unescape_value(decoder)
        .map_err(|e| ForecastError::parse(format!("Invalid value for attribute '{name}': {e}")))?;

    Ok((!value.is_empty()).then(|| value.into_owned()))
}

/// Fetches the boundary document and builds a fresh [`BoundaryIndex`]
#[derive(Debug, Clone)]
pub struct BoundaryLoader {
    fetcher: HttpFetcher,
    url: String,
}

impl BoundaryLoader {
    pub fn new(fetcher: HttpFetcher, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
        }
    }

    /// Fetch and parse the boundary document
    ///
    /// Each call issues a new request; nothing is retained between calls.
    #[tracing::instrument(name = "load_boundaries", skip(self), fields(url = %self.url))]
    pub async fn load(&self) -> Result<BoundaryIndex> {
        info!("Loading boundary document from: {}", self.url);

        let body = self.fetcher.get(&self.url, ACCEPT_XML).await?;
        let xml = std::str::from_utf8(&body).map_err(|e| {
            ForecastError::parse(format!("Boundary document is not valid UTF-8: {e}"))
        })?;

        let index = BoundaryIndex::from_xml(xml).inspect_err(|e| {
            warn!("Failed to parse boundary document: {}", e);
        })?;

        info!(
            "Loaded {} prefectures ({} cities) from boundary document",
            index.len(),
            index.city_count()
        );

        Ok(index)
    }
}
