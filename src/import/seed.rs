//! Built-in sample entries / Yerleşik örnek kelimeler

use anyhow::Result;
use sqlx::SqlitePool;

use super::{clear_words, insert_word, ImportReport, NewWord};

struct SeedWord {
    lemma: &'static str,
    pos: &'static str,
    origin: &'static str,
    definition: &'static str,
    examples: &'static [(&'static str, Option<&'static str>)],
}

const SEED_WORDS: &[SeedWord] = &[
    SeedWord {
        lemma: "ahenk",
        pos: "isim",
        origin: "Farsça",
        definition: "Uyum, düzen.",
        examples: &[("Şiirin ahengi ruhumu dinlendirdi.", None)],
    },
    SeedWord {
        lemma: "aşk",
        pos: "isim",
        origin: "Arapça",
        definition: "Şiddetli sevgi, gönül bağı.",
        examples: &[("Aşk, insanı deli eder.", Some("Halk Sözü"))],
    },
    SeedWord {
        lemma: "gönül",
        pos: "isim",
        origin: "Türkçe",
        definition: "Kalp ve iç dünya anlamında mecazî kullanılır.",
        examples: &[
            ("Gönül ferman dinlemiyor.", None),
            ("Gönül kimi severse güzel odur.", None),
        ],
    },
    SeedWord {
        lemma: "tevazu",
        pos: "isim",
        origin: "Arapça",
        definition: "Alçakgönüllülük.",
        examples: &[("Gerçek bilginlik tevazu gerektirir.", None)],
    },
    SeedWord {
        lemma: "mücadele",
        pos: "isim",
        origin: "Arapça",
        definition: "Birbirine isteklerini kabul ettirmek için iki taraf arasında yapılan zorlu çaba.",
        examples: &[("Hayat bir mücadeledir.", Some("Namık Kemal"))],
    },
    SeedWord {
        lemma: "umut",
        pos: "isim",
        origin: "Türkçe",
        definition: "Ummaktan doğan güven duygusu, ümit.",
        examples: &[("Umut fakirin ekmeğidir.", Some("Atasözü"))],
    },
];

/// Replace the dictionary with the sample entries / Sözlüğü örnek kayıtlarla doldur
pub async fn seed(pool: &SqlitePool) -> Result<ImportReport> {
    let mut tx = pool.begin().await?;
    clear_words(&mut tx).await?;

    let mut report = ImportReport::default();
    for word in SEED_WORDS {
        let id = insert_word(
            &mut tx,
            &NewWord {
                lemma: word.lemma.to_string(),
                pos: Some(word.pos.to_string()),
                origin: Some(word.origin.to_string()),
                definition: word.definition.to_string(),
            },
        )
        .await?;

        for &(sentence, author) in word.examples {
            sqlx::query("INSERT INTO examples (word_id, sentence, author) VALUES (?, ?, ?)")
                .bind(id)
                .bind(sentence)
                .bind(author)
                .execute(&mut *tx)
                .await?;
        }
        report.imported += 1;
    }

    tx.commit().await?;
    tracing::info!("Seeded {} words with their examples", report.imported);
    Ok(report)
}
