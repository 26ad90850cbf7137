use crate::models::{DraftLanguage, EmailRequest};

/// Builds the drafting prompt. The output is a pure function of the request.
pub fn build_email_prompt(request: &EmailRequest) -> String {
    match request.language {
        DraftLanguage::Japanese => japanese_prompt(request),
        DraftLanguage::English => english_prompt(request),
    }
}

fn japanese_prompt(request: &EmailRequest) -> String {
    let recipient_line = request
        .recipient()
        .map(|r| format!("受信者: {r}\n"))
        .unwrap_or_default();

    [
        "あなたは日本語のビジネスメール作成アシスタントです。".to_string(),
        "以下のキーワードをもとに、丁寧かつ簡潔な件名(subject)と本文(body)を作成してください。"
            .to_string(),
        "出力は \"subject\" と \"body\" の2つの文字列フィールドを持つJSONオブジェクトのみとし、説明文やコードフェンスは含めないでください。"
            .to_string(),
        "本文は敬体で書き、挨拶、用件、依頼・結びの順に構成し、適宜改行して読みやすくしてください。"
            .to_string(),
        recipient_line,
        format!("キーワード: {}", request.keyword_line()),
        String::new(),
        "出力例(実際の出力もJSONのみ):".to_string(),
        r#"{ "subject": "【お打ち合わせの件】日程候補のご相談", "body": "いつもお世話になっております。…" }"#
            .to_string(),
    ]
    .join("\n")
}

fn english_prompt(request: &EmailRequest) -> String {
    let recipient_line = request
        .recipient()
        .map(|r| format!("Recipient: {r}\n"))
        .unwrap_or_default();

    [
        "You are a writing assistant for formal business email.".to_string(),
        "Using the keywords below, write a polite and concise subject and body.".to_string(),
        "Return only a JSON object with two string fields, \"subject\" and \"body\". Do not add commentary or code fences."
            .to_string(),
        "Structure the body as greeting, purpose, then request and closing, with line breaks for readability."
            .to_string(),
        recipient_line,
        format!("Keywords: {}", request.keyword_line()),
        String::new(),
        "Example (the real output must also be JSON only):".to_string(),
        r#"{ "subject": "Scheduling our next meeting", "body": "Dear Ms. Smith,\n..." }"#
            .to_string(),
    ]
    .join("\n")
}
