use crate::query::execute::QueryResult;

/// Canned reply for anything the bot cannot answer, off-topic chat included.
pub const FALLBACK_MESSAGE: &str = "感謝您的詢問，請詢問亞鈺汽車相關問題，我們很高興為您服務！😄";

pub fn format_reply(result: &QueryResult) -> String {
    match result {
        QueryResult::Answer(text) if !text.trim().is_empty() => text.clone(),
        _ => FALLBACK_MESSAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_pass_through_verbatim() {
        let r = QueryResult::Answer("聯絡電話：02-1234-5678".into());
        assert_eq!(format_reply(&r), "聯絡電話：02-1234-5678");
    }

    #[test]
    fn everything_else_falls_back() {
        for r in [
            QueryResult::NotFound,
            QueryResult::Insufficient,
            QueryResult::Answer("   ".into()),
        ] {
            assert_eq!(format_reply(&r), FALLBACK_MESSAGE);
        }
    }
}
