use async_trait::async_trait;
use std::collections::HashSet;

use super::{WordCorpus, WordRecord};
use crate::error::CorpusError;
use crate::text::lowercase;

/// In-memory corpus / Bellek içi sözlük
#[derive(Debug, Clone, Default)]
pub struct MemoryCorpus {
    words: Vec<WordRecord>,
}

impl MemoryCorpus {
    pub fn new(words: Vec<WordRecord>) -> Self {
        Self { words }
    }

    pub fn push(&mut self, word: WordRecord) {
        self.words.push(word);
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn matching<F>(&self, limit: usize, pred: F) -> Vec<WordRecord>
    where
        F: Fn(&WordRecord) -> bool,
    {
        self.words
            .iter()
            .filter(|w| pred(w))
            .take(limit)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl WordCorpus for MemoryCorpus {
    async fn get_by_id(&self, id: i64) -> Result<Option<WordRecord>, CorpusError> {
        Ok(self.words.iter().find(|w| w.id == id).cloned())
    }

    async fn scan_sample(
        &self,
        exclude_ids: &HashSet<i64>,
        limit: usize,
    ) -> Result<Vec<WordRecord>, CorpusError> {
        Ok(self.matching(limit, |w| !exclude_ids.contains(&w.id)))
    }

    async fn find_by_exact_definition(
        &self,
        text: &str,
        limit: usize,
    ) -> Result<Vec<WordRecord>, CorpusError> {
        let needle = lowercase(text);
        Ok(self.matching(limit, |w| lowercase(&w.definition) == needle))
    }

    async fn find_by_lemma(&self, text: &str, limit: usize) -> Result<Vec<WordRecord>, CorpusError> {
        let needle = lowercase(text);
        Ok(self.matching(limit, |w| lowercase(&w.lemma) == needle))
    }

    async fn find_by_definition_substring(
        &self,
        text: &str,
        limit: usize,
    ) -> Result<Vec<WordRecord>, CorpusError> {
        let needle = lowercase(text);
        Ok(self.matching(limit, |w| lowercase(&w.definition).contains(&needle)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> MemoryCorpus {
        MemoryCorpus::new(vec![
            WordRecord::new(1, "Al", "kırmızı"),
            WordRecord::new(2, "kırmızı", "Al"),
            WordRecord::new(3, "kelime", "Anlamı olan ses birliği"),
        ])
    }

    #[tokio::test]
    async fn test_case_insensitive_lookups() {
        let c = corpus();
        assert_eq!(c.find_by_lemma("al", 5).await.unwrap()[0].id, 1);
        assert_eq!(c.find_by_exact_definition("AL", 5).await.unwrap()[0].id, 2);
        assert_eq!(c.find_by_definition_substring("SES", 5).await.unwrap()[0].id, 3);
        assert!(c.get_by_id(9).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_scan_sample_excludes_and_limits() {
        let c = corpus();
        let exclude: HashSet<i64> = [2].into_iter().collect();
        let ids: Vec<i64> = c
            .scan_sample(&exclude, 10)
            .await
            .unwrap()
            .into_iter()
            .map(|w| w.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(c.scan_sample(&HashSet::new(), 1).await.unwrap().len(), 1);
    }
}
