//! Similar word discovery / Eş anlamlı kelime bulma
//!
//! Strategies run in a fixed order, from highest to lowest precision, and
//! each sees the ids collected by the ones before it:
//! 1a. exact gloss: other words defined as exactly the target lemma
//! 1b. reverse gloss: the word the target is glossed as, if its gloss is one word
//! 2.  cross reference: definitions mentioning the target lemma as a whole word
//! 3.  token overlap: definitions whose token sets have a high Jaccard score
//!
//! Results are deduplicated by id (first strategy wins), never contain the
//! target itself and are truncated only once all strategies have run.
//!
//! Token overlap only scans a bounded sample of the corpus, so on large
//! dictionaries its matches depend on storage order rather than a ranking over
//! every word.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::corpus::{WordCorpus, WordRecord};
use crate::error::{CorpusError, SimilarityError};
use crate::models::primary_definition;
use crate::text::{self, WholeWordMatcher, MIN_TOKEN_LEN, STOP_WORDS};

/// Similarity limits / Benzerlik sınırları
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityOptions {
    /// Final result cap / Toplam sonuç sınırı
    pub result_limit: usize,
    pub exact_gloss_limit: usize,
    pub reverse_gloss_limit: usize,
    /// Candidates fetched before the whole-word filter / Süzgeç öncesi aday sayısı
    pub cross_reference_fetch: usize,
    /// Words scanned for token overlap / Örtüşme için taranan kelime sayısı
    pub scan_limit: usize,
    /// Minimum Jaccard score / En düşük Jaccard puanı
    pub overlap_threshold: f64,
}

impl Default for SimilarityOptions {
    fn default() -> Self {
        Self {
            result_limit: 10,
            exact_gloss_limit: 10,
            reverse_gloss_limit: 5,
            cross_reference_fetch: 20,
            scan_limit: 3000,
            overlap_threshold: 0.6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    ExactGloss,
    ReverseGloss,
    CrossReference,
    TokenOverlap,
}

impl Strategy {
    /// Mandatory evaluation order / Zorunlu çalışma sırası
    pub const ORDER: [Strategy; 4] = [
        Strategy::ExactGloss,
        Strategy::ReverseGloss,
        Strategy::CrossReference,
        Strategy::TokenOverlap,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::ExactGloss => "exact_gloss",
            Strategy::ReverseGloss => "reverse_gloss",
            Strategy::CrossReference => "cross_reference",
            Strategy::TokenOverlap => "token_overlap",
        }
    }
}

/// A similar word and the strategy that found it / Benzer kelime ve bulan strateji
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityCandidate {
    pub word: WordRecord,
    pub strategy: Strategy,
}

/// The target word with its normalized forms / Hedef kelime
struct Target<'a> {
    record: &'a WordRecord,
    lemma: String,
    primary: String,
}

impl<'a> Target<'a> {
    fn new(record: &'a WordRecord) -> Self {
        Self {
            record,
            lemma: text::lowercase(record.lemma.trim()),
            primary: primary_definition(&record.definition),
        }
    }
}

/// Ordered, id-deduplicated result list / Sıralı ve tekrarsız sonuç listesi
struct Accumulator {
    target_id: i64,
    seen: HashSet<i64>,
    candidates: Vec<SimilarityCandidate>,
}

impl Accumulator {
    fn new(target_id: i64) -> Self {
        Self {
            target_id,
            seen: HashSet::new(),
            candidates: Vec::new(),
        }
    }

    fn contains(&self, id: i64) -> bool {
        id == self.target_id || self.seen.contains(&id)
    }

    /// Ids a later strategy must skip, target included / Atlanacak kimlikler
    fn excluded_ids(&self) -> HashSet<i64> {
        let mut ids = self.seen.clone();
        ids.insert(self.target_id);
        ids
    }

    fn merge(&mut self, strategy: Strategy, words: Vec<WordRecord>) -> usize {
        let mut added = 0;
        for word in words {
            if self.contains(word.id) {
                continue;
            }
            self.seen.insert(word.id);
            self.candidates.push(SimilarityCandidate { word, strategy });
            added += 1;
        }
        added
    }

    fn into_candidates(self, limit: usize) -> Vec<SimilarityCandidate> {
        let mut candidates = self.candidates;
        candidates.truncate(limit);
        candidates
    }
}

/// Drop the target and cap, for queries that cannot exclude it themselves
fn without_target(words: Vec<WordRecord>, target_id: i64, limit: usize) -> Vec<WordRecord> {
    words
        .into_iter()
        .filter(|w| w.id != target_id)
        .take(limit)
        .collect()
}

/// Similar word finder / Benzer kelime bulucu
///
/// Holds no state between calls; one engine can serve concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct SimilarityEngine {
    options: SimilarityOptions,
}

impl SimilarityEngine {
    pub fn new(options: SimilarityOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SimilarityOptions {
        &self.options
    }

    /// Similar words for `target_id`, at most `result_limit` / Benzer kelimeler
    pub async fn find_similar<C>(&self, target_id: i64, corpus: &C) -> Result<Vec<WordRecord>, SimilarityError>
    where
        C: WordCorpus + ?Sized,
    {
        let candidates = self.find_candidates(target_id, corpus).await?;
        Ok(candidates.into_iter().map(|c| c.word).collect())
    }

    /// Like [`find_similar`](Self::find_similar), keeping the finding strategy
    pub async fn find_candidates<C>(
        &self,
        target_id: i64,
        corpus: &C,
    ) -> Result<Vec<SimilarityCandidate>, SimilarityError>
    where
        C: WordCorpus + ?Sized,
    {
        let record = corpus
            .get_by_id(target_id)
            .await?
            .ok_or(SimilarityError::NotFound(target_id))?;
        let target = Target::new(&record);

        let mut acc = Accumulator::new(target_id);
        for strategy in Strategy::ORDER {
            // A failed read only costs this strategy's matches
            match self.run_strategy(strategy, &target, corpus, &acc).await {
                Ok(found) => {
                    let added = acc.merge(strategy, found);
                    tracing::debug!("Similar words for {}: {} added {}", target_id, strategy.name(), added);
                }
                Err(e) => {
                    tracing::warn!("Similar words for {}: {} failed: {}", target_id, strategy.name(), e);
                }
            }
        }

        Ok(acc.into_candidates(self.options.result_limit))
    }

    async fn run_strategy<C>(
        &self,
        strategy: Strategy,
        target: &Target<'_>,
        corpus: &C,
        acc: &Accumulator,
    ) -> Result<Vec<WordRecord>, CorpusError>
    where
        C: WordCorpus + ?Sized,
    {
        match strategy {
            Strategy::ExactGloss => self.exact_gloss(target, corpus).await,
            Strategy::ReverseGloss => self.reverse_gloss(target, corpus).await,
            Strategy::CrossReference => self.cross_reference(target, corpus).await,
            Strategy::TokenOverlap => self.token_overlap(target, corpus, acc).await,
        }
    }

    async fn exact_gloss<C>(&self, target: &Target<'_>, corpus: &C) -> Result<Vec<WordRecord>, CorpusError>
    where
        C: WordCorpus + ?Sized,
    {
        if target.lemma.is_empty() {
            return Ok(Vec::new());
        }
        let limit = self.options.exact_gloss_limit;
        let words = corpus.find_by_exact_definition(&target.lemma, limit.saturating_add(1)).await?;
        Ok(without_target(words, target.record.id, limit))
    }

    async fn reverse_gloss<C>(&self, target: &Target<'_>, corpus: &C) -> Result<Vec<WordRecord>, CorpusError>
    where
        C: WordCorpus + ?Sized,
    {
        let token = match text::single_token(&target.primary) {
            Some(token) if token.chars().count() >= MIN_TOKEN_LEN => token,
            _ => return Ok(Vec::new()),
        };
        let limit = self.options.reverse_gloss_limit;
        let words = corpus.find_by_lemma(&token, limit.saturating_add(1)).await?;
        Ok(without_target(words, target.record.id, limit))
    }

    async fn cross_reference<C>(&self, target: &Target<'_>, corpus: &C) -> Result<Vec<WordRecord>, CorpusError>
    where
        C: WordCorpus + ?Sized,
    {
        let matcher = match WholeWordMatcher::new(&target.lemma) {
            Some(m) => m,
            None => return Ok(Vec::new()),
        };
        let fetch = self.options.cross_reference_fetch;
        let words = corpus.find_by_definition_substring(&target.lemma, fetch.saturating_add(1)).await?;
        Ok(without_target(words, target.record.id, fetch)
            .into_iter()
            .filter(|w| matcher.is_match(&text::lowercase(&w.definition)))
            .collect())
    }

    async fn token_overlap<C>(
        &self,
        target: &Target<'_>,
        corpus: &C,
        acc: &Accumulator,
    ) -> Result<Vec<WordRecord>, CorpusError>
    where
        C: WordCorpus + ?Sized,
    {
        let target_tokens = text::definition_tokens(&target.primary, &STOP_WORDS);
        if target_tokens.is_empty() {
            return Ok(Vec::new());
        }

        let sample = corpus.scan_sample(&acc.excluded_ids(), self.options.scan_limit).await?;
        let threshold = self.options.overlap_threshold;
        Ok(sample
            .into_iter()
            .filter(|w| !acc.contains(w.id))
            .filter(|w| {
                let tokens = text::definition_tokens(&primary_definition(&w.definition), &STOP_WORDS);
                text::jaccard(&target_tokens, &tokens) >= threshold
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::MemoryCorpus;
    use async_trait::async_trait;

    fn engine() -> SimilarityEngine {
        SimilarityEngine::default()
    }

    fn ids(words: &[WordRecord]) -> Vec<i64> {
        words.iter().map(|w| w.id).collect()
    }

    /// Corpus whose bulk queries fail, for degradation tests
    struct FlakyCorpus {
        inner: MemoryCorpus,
        fail_scan: bool,
        fail_substring: bool,
    }

    #[async_trait]
    impl WordCorpus for FlakyCorpus {
        async fn get_by_id(&self, id: i64) -> Result<Option<WordRecord>, CorpusError> {
            self.inner.get_by_id(id).await
        }

        async fn scan_sample(
            &self,
            exclude_ids: &HashSet<i64>,
            limit: usize,
        ) -> Result<Vec<WordRecord>, CorpusError> {
            if self.fail_scan {
                return Err(CorpusError::Unavailable("scan".into()));
            }
            self.inner.scan_sample(exclude_ids, limit).await
        }

        async fn find_by_exact_definition(
            &self,
            text: &str,
            limit: usize,
        ) -> Result<Vec<WordRecord>, CorpusError> {
            self.inner.find_by_exact_definition(text, limit).await
        }

        async fn find_by_lemma(&self, text: &str, limit: usize) -> Result<Vec<WordRecord>, CorpusError> {
            self.inner.find_by_lemma(text, limit).await
        }

        async fn find_by_definition_substring(
            &self,
            text: &str,
            limit: usize,
        ) -> Result<Vec<WordRecord>, CorpusError> {
            if self.fail_substring {
                return Err(CorpusError::Unavailable("substring".into()));
            }
            self.inner.find_by_definition_substring(text, limit).await
        }
    }

    #[tokio::test]
    async fn test_exact_gloss_finds_reciprocal_word() {
        let corpus = MemoryCorpus::new(vec![
            WordRecord::new(1, "al", "Kırmızı renk."),
            WordRecord::new(2, "kırmızı", "al"),
            WordRecord::new(3, "mavi", "Gök rengi."),
        ]);
        let found = engine().find_candidates(1, &corpus).await.unwrap();
        assert_eq!(found[0].word.lemma, "kırmızı");
        assert_eq!(found[0].strategy, Strategy::ExactGloss);
    }

    #[tokio::test]
    async fn test_reverse_gloss_without_exact_match() {
        let corpus = MemoryCorpus::new(vec![
            WordRecord::new(1, "irsal", "Gönderme."),
            WordRecord::new(2, "gönderme", "Göndermek işi, yollama."),
        ]);
        let found = engine().find_candidates(1, &corpus).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].word.id, 2);
        assert_eq!(found[0].strategy, Strategy::ReverseGloss);
    }

    #[tokio::test]
    async fn test_reverse_gloss_needs_three_letters() {
        let corpus = MemoryCorpus::new(vec![
            WordRecord::new(1, "kızıl", "Al."),
            WordRecord::new(2, "al", "Kırmızı renk."),
        ]);
        let found = engine().find_candidates(1, &corpus).await.unwrap();
        assert!(found.iter().all(|c| c.strategy != Strategy::ReverseGloss));
    }

    #[tokio::test]
    async fn test_cross_reference_requires_whole_word() {
        let corpus = MemoryCorpus::new(vec![
            WordRecord::new(1, "el", "Kolun bilekten sonraki bölümü."),
            WordRecord::new(2, "kelime", "Bir kelime ile anlatılan."),
            WordRecord::new(3, "avuç", "El ayasının içi."),
        ]);
        let found = engine().find_candidates(1, &corpus).await.unwrap();
        let found_ids: Vec<i64> = found.iter().map(|c| c.word.id).collect();
        assert_eq!(found_ids, vec![3]);
        assert_eq!(found[0].strategy, Strategy::CrossReference);
    }

    #[tokio::test]
    async fn test_cross_reference_escapes_lemma() {
        let corpus = MemoryCorpus::new(vec![
            WordRecord::new(1, "c++", "Bir programlama dili."),
            WordRecord::new(2, "derleyici", "c++ kodunu çeviren program."),
            WordRecord::new(3, "cc", "Santimetreküp."),
        ]);
        let found = engine().find_similar(1, &corpus).await.unwrap();
        assert_eq!(ids(&found), vec![2]);
    }

    #[tokio::test]
    async fn test_token_overlap_identical_definitions() {
        let corpus = MemoryCorpus::new(vec![
            WordRecord::new(1, "ahenk", "Uyum, düzen."),
            WordRecord::new(2, "tenasüp", "uyum düzen"),
            WordRecord::new(3, "umut", "Ummaktan doğan güven duygusu."),
        ]);
        let found = engine().find_candidates(1, &corpus).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].word.id, 2);
        assert_eq!(found[0].strategy, Strategy::TokenOverlap);
    }

    #[tokio::test]
    async fn test_token_overlap_ignores_stop_words_and_short_tokens() {
        let corpus = MemoryCorpus::new(vec![
            WordRecord::new(1, "birinci", "bir ve ile için de"),
            WordRecord::new(2, "ikinci", "bir ve ile için de"),
            WordRecord::new(3, "boş", ""),
            WordRecord::new(4, "yine boş", ""),
        ]);
        assert!(engine().find_similar(1, &corpus).await.unwrap().is_empty());
        assert!(engine().find_similar(3, &corpus).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_token_overlap_threshold() {
        let corpus = MemoryCorpus::new(vec![
            WordRecord::new(1, "a1", "kalp gönül sevgi bağlılık muhabbet"),
            // 3 of 5 shared, union 5 -> 0.6
            WordRecord::new(2, "a2", "kalp gönül sevgi"),
            // 2 shared, union 7 -> 0.29
            WordRecord::new(3, "a3", "kalp gönül dert keder"),
        ]);
        let found = engine().find_similar(1, &corpus).await.unwrap();
        assert_eq!(ids(&found), vec![2]);
    }

    #[tokio::test]
    async fn test_strategy_order_and_dedup() {
        let corpus = MemoryCorpus::new(vec![
            WordRecord::new(1, "sevda", "Aşk."),
            // exact gloss, also a whole-word mention of the lemma
            WordRecord::new(2, "tutku", "sevda"),
            WordRecord::new(3, "aşk", "Şiddetli sevgi."),
            WordRecord::new(4, "meftun", "Sevda ile bağlı."),
        ]);
        let found = engine().find_candidates(1, &corpus).await.unwrap();
        let order: Vec<(i64, Strategy)> = found.iter().map(|c| (c.word.id, c.strategy)).collect();
        assert_eq!(
            order,
            vec![
                (2, Strategy::ExactGloss),
                (3, Strategy::ReverseGloss),
                (4, Strategy::CrossReference),
            ]
        );
    }

    fn engine_with(options: SimilarityOptions) -> SimilarityEngine {
        SimilarityEngine::new(options)
    }

    #[tokio::test]
    async fn test_token_overlap_scans_only_the_sample() {
        let corpus = MemoryCorpus::new(vec![
            WordRecord::new(1, "ahenk", "Uyum, düzen."),
            WordRecord::new(2, "mavi", "Gök rengi."),
            WordRecord::new(3, "umut", "Ummaktan doğan güven."),
            WordRecord::new(4, "tenasüp", "uyum düzen"),
        ]);
        assert_eq!(ids(&engine().find_similar(1, &corpus).await.unwrap()), vec![4]);

        let narrow = engine_with(SimilarityOptions { scan_limit: 2, ..Default::default() });
        assert!(narrow.find_similar(1, &corpus).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_exact_gloss_cap_applies_before_final_limit() {
        // The target glosses itself, which must not use up a slot
        let mut corpus = MemoryCorpus::new(vec![WordRecord::new(1, "su", "su")]);
        for id in 2..7 {
            corpus.push(WordRecord::new(id, &format!("w{}", id), "su"));
        }
        let options = SimilarityOptions { exact_gloss_limit: 2, ..Default::default() };
        let found = engine_with(options).find_candidates(1, &corpus).await.unwrap();
        let order: Vec<(i64, Strategy)> = found.iter().map(|c| (c.word.id, c.strategy)).collect();
        assert_eq!(
            order,
            vec![
                (2, Strategy::ExactGloss),
                (3, Strategy::ExactGloss),
                (4, Strategy::CrossReference),
                (5, Strategy::CrossReference),
                (6, Strategy::CrossReference),
            ]
        );
    }

    #[tokio::test]
    async fn test_reverse_gloss_cap() {
        let corpus = MemoryCorpus::new(vec![
            WordRecord::new(1, "irsal", "Gönderme."),
            WordRecord::new(2, "gönderme", "Yollama."),
            WordRecord::new(3, "Gönderme", "Sevk etme."),
        ]);
        assert_eq!(ids(&engine().find_similar(1, &corpus).await.unwrap()), vec![2, 3]);

        let options = SimilarityOptions { reverse_gloss_limit: 1, ..Default::default() };
        let found = engine_with(options).find_candidates(1, &corpus).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].word.id, 2);
        assert_eq!(found[0].strategy, Strategy::ReverseGloss);
    }

    #[tokio::test]
    async fn test_cross_reference_filters_within_fetched_candidates() {
        let corpus = MemoryCorpus::new(vec![
            WordRecord::new(1, "el", "Kolun ucu."),
            WordRecord::new(2, "kelime", "Bir kelime."),
            WordRecord::new(3, "avuç", "El ayası."),
            WordRecord::new(4, "parmak", "El uzantısı."),
        ]);
        assert_eq!(ids(&engine().find_similar(1, &corpus).await.unwrap()), vec![3, 4]);

        // Only "kelime" and "avuç" are fetched; the substring-only hit takes a slot
        let options = SimilarityOptions { cross_reference_fetch: 2, ..Default::default() };
        assert_eq!(ids(&engine_with(options).find_similar(1, &corpus).await.unwrap()), vec![3]);
    }

    #[tokio::test]
    async fn test_cross_reference_wins_over_token_overlap() {
        let corpus = MemoryCorpus::new(vec![
            WordRecord::new(1, "uyum", "ahenk düzen intizam denge"),
            // mentions the lemma and shares 4 of 5 tokens
            WordRecord::new(2, "tenasüp", "uyum ahenk düzen intizam denge"),
            WordRecord::new(3, "ahenkli", "ahenk düzen intizam denge yapı"),
        ]);
        let found = engine().find_candidates(1, &corpus).await.unwrap();
        let order: Vec<(i64, Strategy)> = found.iter().map(|c| (c.word.id, c.strategy)).collect();
        assert_eq!(
            order,
            vec![(2, Strategy::CrossReference), (3, Strategy::TokenOverlap)]
        );
    }

    #[tokio::test]
    async fn test_unbounded_limits_from_config() {
        let corpus = MemoryCorpus::new(vec![
            WordRecord::new(1, "irsal", "Gönderme."),
            WordRecord::new(2, "gönderme", "irsal"),
            WordRecord::new(3, "sevk", "İrsal etme."),
        ]);
        let options = SimilarityOptions {
            exact_gloss_limit: usize::MAX,
            reverse_gloss_limit: usize::MAX,
            cross_reference_fetch: usize::MAX,
            ..Default::default()
        };
        let found = engine_with(options).find_candidates(1, &corpus).await.unwrap();
        let order: Vec<(i64, Strategy)> = found.iter().map(|c| (c.word.id, c.strategy)).collect();
        assert_eq!(order, vec![(2, Strategy::ExactGloss), (3, Strategy::CrossReference)]);
    }

    #[tokio::test]
    async fn test_never_includes_target_and_caps_results() {
        let mut corpus = MemoryCorpus::new(vec![WordRecord::new(1, "su", "su")]);
        for id in 2..40 {
            corpus.push(WordRecord::new(id, &format!("w{}", id), "su"));
        }
        let found = engine().find_similar(1, &corpus).await.unwrap();
        assert_eq!(found.len(), 10);
        assert!(!found.iter().any(|w| w.id == 1));

        let unique: HashSet<i64> = found.iter().map(|w| w.id).collect();
        assert_eq!(unique.len(), found.len());
    }

    #[tokio::test]
    async fn test_unknown_target_is_not_found() {
        let corpus = MemoryCorpus::new(vec![WordRecord::new(1, "al", "kırmızı")]);
        let err = engine().find_similar(42, &corpus).await.unwrap_err();
        assert!(matches!(err, SimilarityError::NotFound(42)));
    }

    #[tokio::test]
    async fn test_no_matches_is_empty() {
        let corpus = MemoryCorpus::new(vec![
            WordRecord::new(1, "ahenk", "Uyum, düzen."),
            WordRecord::new(2, "umut", "Ummaktan doğan güven duygusu."),
        ]);
        assert!(engine().find_similar(1, &corpus).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_strategy_does_not_abort() {
        let corpus = FlakyCorpus {
            inner: MemoryCorpus::new(vec![
                WordRecord::new(1, "al", "Kırmızı."),
                WordRecord::new(2, "kırmızı", "al"),
                WordRecord::new(3, "kızıl", "al renkli"),
            ]),
            fail_scan: true,
            fail_substring: true,
        };
        let found = engine().find_similar(1, &corpus).await.unwrap();
        assert_eq!(ids(&found), vec![2]);
    }

    #[tokio::test]
    async fn test_multi_sense_definition_uses_primary_sense() {
        let corpus = MemoryCorpus::new(vec![
            WordRecord::new(1, "irsal", r#"["Gönderme.", "Yollama, sevk."]"#),
            WordRecord::new(2, "gönderme", "Göndermek işi."),
        ]);
        let found = engine().find_similar(1, &corpus).await.unwrap();
        assert_eq!(ids(&found), vec![2]);
    }
}
