/// Builds the instruction sent alongside the image.
///
/// `tone` is inserted verbatim; the server does not restrict it to the known tones.
pub fn caption_prompt(tone: &str) -> String {
    format!(
        "Generate a {tone} Instagram caption for this image. Be concise and catchy. \
         Do not use markdown or any bold or italic emphasis. \
         If you offer more than one caption, separate them with a blank line. \
         Reply with the caption text only, without any introduction or explanation."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_tone() {
        let prompt = caption_prompt("savage");
        assert!(prompt.starts_with("Generate a savage Instagram caption for this image."));
    }

    #[test]
    fn test_prompt_carries_formatting_constraints() {
        let prompt = caption_prompt("poetic");
        assert!(prompt.contains("concise"));
        assert!(prompt.contains("markdown"));
        assert!(prompt.contains("blank line"));
        assert!(prompt.contains("without any introduction"));
    }

    #[test]
    fn test_unknown_tone_passes_through() {
        assert!(caption_prompt("pirate-speak").contains("a pirate-speak Instagram caption"));
    }
}
