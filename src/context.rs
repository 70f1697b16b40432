//! The context store: clustered event points per category, sub-type and
//! time window, bound to one place and period.
//!
//! Raw input is the nested mapping produced by the ingestion step:
//! `category -> sub-type -> window -> [[lat, lon], ...]`. Loading parses
//! window keys, classifies each category's shape and derives its base
//! name once, so queries never re-inspect key sets.

use crate::constants::*;
use crate::error::*;
use crate::location::*;
use crate::window::*;
use log::*;
use std::collections::BTreeMap;
use std::io::Read;

/// Raw nested mapping as deserialized from the ingestion output.
pub type RawContextStore = BTreeMap<String, RawCategory>;
pub type RawCategory = BTreeMap<String, RawWindows>;
pub type RawWindows = BTreeMap<String, Vec<GeoPoint>>;

/// Point clouds of one sub-type, ordered by window boundary.
#[derive(Clone, Debug, Default)]
pub struct WindowedPoints {
    windows: Vec<(WindowBoundary, Vec<GeoPoint>)>,
}

impl WindowedPoints {
    pub fn from_raw(category: &str, subtype: &str, raw: RawWindows) -> Result<WindowedPoints> {
        let mut merged: BTreeMap<WindowBoundary, Vec<GeoPoint>> = BTreeMap::new();

        for (key, points) in raw {
            let boundary: WindowBoundary =
                key.parse().map_err(|_| ContextError::InvalidWindow {
                    category: category.to_string(),
                    subtype: subtype.to_string(),
                    key: key.clone(),
                })?;

            // "60" and "060" name the same boundary.
            merged.entry(boundary).or_default().extend(points);
        }

        if merged.is_empty() {
            return Err(ContextError::EmptyWindows {
                category: category.to_string(),
                subtype: subtype.to_string(),
            });
        }

        Ok(WindowedPoints {
            windows: merged.into_iter().collect(),
        })
    }

    pub fn boundaries(&self) -> impl Iterator<Item = WindowBoundary> + '_ {
        self.windows.iter().map(|(boundary, _)| *boundary)
    }

    pub fn points(&self, window: WindowBoundary) -> Option<&[GeoPoint]> {
        self.windows
            .binary_search_by_key(&window, |(boundary, _)| *boundary)
            .ok()
            .map(|index| self.windows[index].1.as_slice())
    }

    /// Window containing `query_time` and its points.
    pub fn resolve(&self, query_time: f64) -> Option<(WindowBoundary, &[GeoPoint])> {
        let window = select_window(self.boundaries(), query_time)?;
        self.points(window).map(|points| (window, points))
    }
}

/// Whether a category is partitioned into named sub-types.
#[derive(Clone, Debug)]
pub enum CategoryShape {
    /// A single implicit `unknown` sub-type.
    Unnamed(WindowedPoints),
    /// Named sub-types, each resolving its window independently.
    Typed(BTreeMap<String, WindowedPoints>),
}

impl CategoryShape {
    /// Every sub-type with its name. `Unnamed` yields `unknown` once.
    pub fn subtypes(&self) -> Box<dyn Iterator<Item = (&str, &WindowedPoints)> + '_> {
        match self {
            CategoryShape::Unnamed(points) => Box::new(std::iter::once((UNKNOWN_SUBTYPE, points))),
            CategoryShape::Typed(subtypes) => {
                Box::new(subtypes.iter().map(|(name, points)| (name.as_str(), points)))
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct Category {
    key: String,
    base_name: String,
    shape: CategoryShape,
}

impl Category {
    pub fn from_raw(key: &str, place: &str, raw: RawCategory) -> Result<Category> {
        let mut subtypes = BTreeMap::new();
        for (subtype, windows) in raw {
            let points = WindowedPoints::from_raw(key, &subtype, windows)?;
            subtypes.insert(subtype, points);
        }

        let shape = match subtypes.remove(UNKNOWN_SUBTYPE) {
            Some(points) if subtypes.is_empty() => CategoryShape::Unnamed(points),
            Some(points) => {
                subtypes.insert(UNKNOWN_SUBTYPE.to_string(), points);
                CategoryShape::Typed(subtypes)
            }
            None => CategoryShape::Typed(subtypes),
        };

        Ok(Category {
            key: key.to_string(),
            base_name: base_name(key, place),
            shape,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Signal name used for weights and the breakdown, e.g. `crimes`.
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn shape(&self) -> &CategoryShape {
        &self.shape
    }
}

/// Category key with the place tokens removed: `chicago_crimes` and
/// `crimes_chicago` both become `crimes`.
pub fn base_name(key: &str, place: &str) -> String {
    let name = key
        .split('_')
        .filter(|token| !token.is_empty() && *token != place)
        .collect::<Vec<_>>()
        .join("_");

    if name.is_empty() {
        key.to_string()
    } else {
        name
    }
}

/// Immutable context for one place and period.
#[derive(Clone, Debug)]
pub struct ContextStore {
    place: String,
    period: String,
    categories: BTreeMap<String, Category>,
}

impl ContextStore {
    pub fn from_raw(
        place: impl Into<String>,
        period: impl Into<String>,
        raw: RawContextStore,
    ) -> Result<ContextStore> {
        let place = place.into();
        let period = period.into();

        let categories = raw
            .into_iter()
            .map(|(key, category)| {
                Category::from_raw(&key, &place, category).map(|category| (key, category))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;

        info!(
            "Loaded context store: place={}, period={}, categories={}",
            place,
            period,
            categories.len()
        );

        Ok(ContextStore {
            place,
            period,
            categories,
        })
    }

    pub fn from_json_str(place: &str, period: &str, json: &str) -> Result<ContextStore> {
        let raw: RawContextStore = serde_json::from_str(json)?;
        ContextStore::from_raw(place, period, raw)
    }

    pub fn from_reader<R: Read>(place: &str, period: &str, reader: R) -> Result<ContextStore> {
        let raw: RawContextStore = serde_json::from_reader(reader)?;
        ContextStore::from_raw(place, period, raw)
    }

    pub fn place(&self) -> &str {
        &self.place
    }

    pub fn period(&self) -> &str {
        &self.period
    }

    pub fn category(&self, key: &str) -> Option<&Category> {
        self.categories.get(key)
    }

    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.values()
    }

    /// Categories whose key mentions the place, in lexicographic key order.
    pub fn relevant_categories(&self) -> impl Iterator<Item = &Category> {
        let place = self.place.as_str();
        self.categories
            .values()
            .filter(move |category| category.key.contains(place))
    }
}
