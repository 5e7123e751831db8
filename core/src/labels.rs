//! Short display labels for bubbles, legends and wheel segments.

use phf::phf_map;

/// Preferred short forms for long platform, group, topic and place names
pub static LABEL_ABBREVIATIONS: phf::Map<&'static str, &'static str> = phf_map! {
    // Platforms
    "Newsletter - Substack" => "Substack",
    "Newsletter - Ghost" => "Ghost",
    "Newsletter - Beehiiv" => "Beehiiv",
    "Newsletter - ConvertKit" => "ConvertKit",
    "Newsletter - Medium" => "Medium",
    "Newsletter - Buttondown" => "Buttondown",
    "Video - YouTube" => "YouTube",
    "Video - Instagram" => "Instagram",
    "Video - TikTok" => "TikTok",
    "Video - Vimeo" => "Vimeo",
    "Video - Facebook" => "Facebook",
    "Social Media" => "Social",

    // Groups
    "Science, Health & Environment" => "Science & Health",
    "Lifestyle & Personal Life" => "Lifestyle",
    "Power & Politics" => "Politics",
    "Culture & Media" => "Culture",
    "Money & Work" => "Business",
    "Journalism Formats" => "Journalism",
    "General News" => "General",
    "Civic Life" => "Civic",

    // Topics
    "Entertainment/Hollywood" => "Entertainment",
    "Finance/Economics" => "Finance",
    "Climate/Environment" => "Climate",
    "Local Government/Politics" => "Local Gov",
    "International/Foreign Affairs" => "International",
    "Technology/Innovation" => "Tech",
    "Health/Wellness" => "Health",
    "Food/Dining" => "Food",
    "Criminal Justice" => "Justice",

    // Geographies
    "United States" => "US",
    "United Kingdom" => "UK",
    "International" => "Intl",
};

const SEPARATORS: [&str; 6] = [" - ", " / ", " & ", " ", "-", "/"];

/// Shorten `text` to at most `max_chars` characters.
///
/// Tries the abbreviation table, then the text itself, then the first part
/// before a separator, and finally truncates with an ellipsis.
pub fn abbreviate(text: &str, max_chars: usize) -> String {
    if let Some(short) = LABEL_ABBREVIATIONS.get(text)
        && short.chars().count() <= max_chars
    {
        return short.to_string();
    }

    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    for separator in SEPARATORS {
        if let Some((head, _)) = text.split_once(separator)
            && !head.is_empty()
            && head.chars().count() <= max_chars
        {
            return head.to_string();
        }
    }

    let mut truncated: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}

/// Characters that fit in `width_px` at `font_px`, never fewer than three.
pub fn chars_for_width(width_px: f64, font_px: f64) -> usize {
    let char_width = font_px * 0.6;
    (((width_px - 10.0) / char_width).floor().max(3.0)) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_labels_use_the_table() {
        assert_eq!(abbreviate("Video - YouTube", 15), "YouTube");
        assert_eq!(abbreviate("Science, Health & Environment", 18), "Science & Health");
    }

    #[test]
    fn short_text_is_unchanged() {
        assert_eq!(abbreviate("Podcast", 15), "Podcast");
    }

    #[test]
    fn long_text_breaks_at_separator_then_truncates() {
        assert_eq!(abbreviate("Regional Desk - Northwest", 15), "Regional Desk");
        assert_eq!(abbreviate("Supercalifragilistic", 8), "Superca…");
    }

    #[test]
    fn width_budget_has_a_floor() {
        assert_eq!(chars_for_width(5.0, 12.0), 3);
        assert_eq!(chars_for_width(80.0, 10.0), 11);
    }
}
