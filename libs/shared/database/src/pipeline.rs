//! Aggregation pipelines evaluated over any [`DocumentStore`].
//!
//! Only the stages the portal needs are modelled: a filtered lookup join
//! into a foreign collection followed by projections that can map an array
//! of sub-documents to one field and take the set difference of two arrays.

use serde_json::Value;
use tracing::debug;

use crate::document::{Document, Filter};
use crate::error::StoreError;
use crate::store::DocumentStore;

#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Lookup(Lookup),
    Project(Vec<Projection>),
}

/// Joins documents of `from` whose `foreign_field` equals the local
/// `local_field` and that also satisfy `filter`, collected into `as_field`.
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup {
    pub from: String,
    pub local_field: String,
    pub foreign_field: String,
    pub filter: Filter,
    pub as_field: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// Keep `field` as is.
    Include(String),
    /// `field` = `input[*].p` for the first of `paths` the element carries,
    /// `null` for elements carrying none of them.
    Map {
        field: String,
        input: String,
        paths: Vec<String>,
    },
    /// `field` = elements of `left` absent from `right`, first occurrence
    /// order of `left`, without duplicates. `null` if either side is missing.
    SetDifference {
        field: String,
        left: String,
        right: String,
    },
}

impl Pipeline {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    pub fn lookup(mut self, lookup: Lookup) -> Self {
        self.stages.push(Stage::Lookup(lookup));
        self
    }

    pub fn project(mut self, projections: Vec<Projection>) -> Self {
        self.stages.push(Stage::Project(projections));
        self
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Runs the pipeline against `collection`, issuing one `find` for the
    /// source collection and one per lookup stage.
    pub async fn run<S>(&self, store: &S, collection: &str) -> Result<Vec<Document>, StoreError>
    where
        S: DocumentStore + ?Sized,
    {
        let mut documents = store.find(collection, &Filter::all(), None).await?;
        debug!("Running {}-stage pipeline over {} {} documents", self.stages.len(), documents.len(), collection);

        for stage in &self.stages {
            documents = match stage {
                Stage::Lookup(lookup) => {
                    let foreign = store.find(&lookup.from, &lookup.filter, None).await?;
                    apply_lookup(documents, &foreign, lookup)
                }
                Stage::Project(projections) => apply_project(documents, projections)?,
            };
        }

        Ok(documents)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

pub fn apply_lookup(documents: Vec<Document>, foreign: &[Document], lookup: &Lookup) -> Vec<Document> {
    documents
        .into_iter()
        .map(|mut document| {
            let local = document.get(&lookup.local_field).cloned().unwrap_or(Value::Null);
            let joined: Vec<Value> = foreign
                .iter()
                .filter(|candidate| candidate.get(&lookup.foreign_field).unwrap_or(&Value::Null) == &local)
                .map(|candidate| Value::Object(candidate.clone()))
                .collect();
            document.insert(lookup.as_field.clone(), Value::Array(joined));
            document
        })
        .collect()
}

pub fn apply_project(documents: Vec<Document>, projections: &[Projection]) -> Result<Vec<Document>, StoreError> {
    documents
        .iter()
        .map(|document| {
            let mut projected = Document::new();
            for projection in projections {
                match projection {
                    Projection::Include(field) => {
                        if let Some(value) = document.get(field) {
                            projected.insert(field.clone(), value.clone());
                        }
                    }
                    Projection::Map { field, input, paths } => {
                        projected.insert(field.clone(), map_field(document, input, paths)?);
                    }
                    Projection::SetDifference { field, left, right } => {
                        projected.insert(field.clone(), set_difference(document, left, right)?);
                    }
                }
            }
            Ok(projected)
        })
        .collect()
}

fn array_operand<'a>(document: &'a Document, field: &str) -> Result<Option<&'a Vec<Value>>, StoreError> {
    match document.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(other) => Err(StoreError::InvalidDocument(format!(
            "expected '{}' to be an array, found {}",
            field, other
        ))),
    }
}

fn map_field(document: &Document, input: &str, paths: &[String]) -> Result<Value, StoreError> {
    let Some(items) = array_operand(document, input)? else {
        return Ok(Value::Null);
    };

    Ok(Value::Array(
        items
            .iter()
            .map(|item| {
                paths
                    .iter()
                    .find_map(|path| item.get(path).filter(|value| !value.is_null()))
                    .cloned()
                    .unwrap_or(Value::Null)
            })
            .collect(),
    ))
}

fn set_difference(document: &Document, left: &str, right: &str) -> Result<Value, StoreError> {
    let (Some(left), Some(right)) = (array_operand(document, left)?, array_operand(document, right)?) else {
        return Ok(Value::Null);
    };

    let mut remaining: Vec<Value> = Vec::with_capacity(left.len());
    for item in left {
        if !right.contains(item) && !remaining.contains(item) {
            remaining.push(item.clone());
        }
    }
    Ok(Value::Array(remaining))
}
