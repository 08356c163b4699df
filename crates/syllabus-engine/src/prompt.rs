//! Generation prompt for one attempt.

use syllabus_core::models::{RagStrategy, Request};

/// Longest slice of one retrieved span quoted in the prompt.
const MAX_SPAN_CHARS: usize = 500;

fn strategy_instruction(strategy: RagStrategy) -> &'static str {
    match strategy {
        RagStrategy::Simple => {
            "Ikuti struktur dokumen referensi yang paling mirip dan sesuaikan dengan informasi pembelajaran."
        }
        RagStrategy::Advanced => {
            "Sintesis beberapa dokumen referensi; gabungkan poin yang saling melengkapi dan abaikan yang tidak relevan."
        }
        RagStrategy::Graph => {
            "Tonjolkan hubungan antarkonsep dan prasyarat materi sehingga alur tujuan pembelajaran runtut."
        }
        RagStrategy::Adaptive => {
            "Gunakan dokumen referensi bila relevan; bila kurang, susun dari pengetahuan kurikulum umum."
        }
    }
}

/// Build the prompt: request fields, strategy, reviewer constraints, and
/// the retrieved context.
pub fn build_prompt(
    request: &Request,
    strategy: RagStrategy,
    constraints: &[String],
    context: &[String],
) -> String {
    let info = &request.basic_info;
    let mut prompt = String::new();

    prompt.push_str(
        "Anda adalah ahli kurikulum yang menyusun Capaian Pembelajaran (CP) dan Alur Tujuan Pembelajaran (ATP) berdasarkan Kurikulum Merdeka.\n\n",
    );
    prompt.push_str("Informasi Pembelajaran:\n");
    for (label, value) in [
        ("Mata Pelajaran", &info.subject),
        ("Kelas", &info.grade),
        ("Fase", &info.phase),
        ("Topik", &info.topic),
        ("Sub Topik", &info.subtopic),
        ("Alokasi Waktu", &info.time_allocation),
    ] {
        prompt.push_str(&format!("- {label}: {}\n", value.trim()));
    }
    if let Some(cp) = request.supplied_cp() {
        prompt.push_str(&format!("- CP yang sudah ada: {cp}\n"));
    }
    if let Some(atp) = request.supplied_atp() {
        prompt.push_str(&format!("- ATP yang sudah ada: {atp}\n"));
    }

    prompt.push_str(&format!(
        "\nStrategi ({strategy}): {}\n",
        strategy_instruction(strategy)
    ));

    if !constraints.is_empty() {
        prompt.push_str("\nMasukan peninjau yang wajib dipenuhi:\n");
        for constraint in constraints {
            prompt.push_str(&format!("- {constraint}\n"));
        }
    }

    if !context.is_empty() {
        prompt.push_str("\nKonteks dari dokumen referensi:\n");
        for (i, span) in context.iter().enumerate() {
            let quoted: String = span.chars().take(MAX_SPAN_CHARS).collect();
            let ellipsis = if span.chars().count() > MAX_SPAN_CHARS { "..." } else { "" };
            prompt.push_str(&format!("Dokumen {}: {quoted}{ellipsis}\n", i + 1));
        }
    }

    prompt.push_str(
        "\nCP harus memuat kompetensi yang mampu ditunjukkan siswa. ATP harus memuat tujuan pembelajaran berurutan beserta indikator.\n",
    );
    prompt.push_str("Jawab hanya dengan objek JSON: {\"cp\": \"...\", \"atp\": \"...\"}\n");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> Request {
        test_fixtures::sample_request()
    }

    #[test]
    fn prompt_states_fields_strategy_and_constraints() {
        let prompt = build_prompt(
            &request(),
            RagStrategy::Graph,
            &["tambahkan contoh kontekstual".to_string()],
            &[],
        );
        assert!(prompt.contains("Topik: Persamaan Linear"));
        assert!(prompt.contains("Strategi (graph)"));
        assert!(prompt.contains("- tambahkan contoh kontekstual"));
        assert!(!prompt.contains("Konteks dari dokumen referensi"));
        assert!(prompt.contains("{\"cp\""));
    }

    #[test]
    fn long_spans_are_truncated() {
        let span = "a".repeat(MAX_SPAN_CHARS + 10);
        let prompt = build_prompt(&request(), RagStrategy::Simple, &[], &[span]);
        assert!(prompt.contains(&format!("Dokumen 1: {}...", "a".repeat(MAX_SPAN_CHARS))));
    }
}
