// Semantic retrieval
// Embeds FAQ questions once and answers queries by nearest neighbor

pub mod index;


use tracing::{debug, info};

use crate::faq::{FaqEntry, FaqSet};
use crate::ollama::OllamaClient;
use crate::{FaqError, Result};

pub use index::{FlatL2Index, Neighbor};

pub trait Embedder: Send + Sync {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    #[inline]
    fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        self.embed(&[text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| FaqError::Embedding("Embedder returned no vector".to_string()))
    }
}

/// Sentence embeddings served by an Ollama embedding model
#[derive(Debug, Clone)]
pub struct OllamaEmbedder {
    client: OllamaClient,
    model: String,
}

impl OllamaEmbedder {
    #[inline]
    pub fn new(client: OllamaClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

impl Embedder for OllamaEmbedder {
    #[inline]
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.client
            .embed(&self.model, texts)
            .map_err(|e| FaqError::Embedding(format!("{} ({})", e, self.model)))
    }
}

/// Best FAQ entry for a query. There is no relevance threshold, so a
/// match is returned however far away it is.
#[derive(Debug, Clone, PartialEq)]
pub struct FaqMatch<'a> {
    pub index: usize,
    pub distance: f32,
    pub entry: &'a FaqEntry,
}

pub struct SemanticMatcher<E> {
    faq: FaqSet,
    index: FlatL2Index,
    embedder: E,
}

impl<E: Embedder> SemanticMatcher<E> {
    /// Embed every FAQ question and build the index
    #[inline]
    pub fn build(faq: FaqSet, embedder: E) -> Result<Self> {
        info!("Embedding {} FAQ questions", faq.len());

        let vectors = embedder.embed(&faq.questions())?;
        if vectors.len() != faq.len() {
            return Err(FaqError::Embedding(format!(
                "Expected {} question embeddings, got {}",
                faq.len(),
                vectors.len()
            )));
        }

        let index = FlatL2Index::from_vectors(vectors)?;
        info!(
            "Built FAQ index with {} vectors of dimension {}",
            index.len(),
            index.dimension()
        );

        Ok(Self {
            faq,
            index,
            embedder,
        })
    }

    #[inline]
    pub fn best_match(&self, query: &str) -> Result<FaqMatch<'_>> {
        let vector = self.embedder.embed_one(query)?;
        let neighbor = self
            .index
            .nearest(&vector)?
            .ok_or_else(|| FaqError::Index("FAQ index is empty".to_string()))?;

        let entry = self.faq.get(neighbor.index).ok_or_else(|| {
            FaqError::Index(format!("Index {} has no FAQ entry", neighbor.index))
        })?;

        debug!(
            "Query {:?} matched FAQ {} at distance {:.4}",
            query, neighbor.index, neighbor.distance
        );
        Ok(FaqMatch {
            index: neighbor.index,
            distance: neighbor.distance,
            entry,
        })
    }

    #[inline]
    pub fn faq(&self) -> &FaqSet {
        &self.faq
    }

    #[inline]
    pub fn index(&self) -> &FlatL2Index {
        &self.index
    }
}
