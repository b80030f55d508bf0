//! Anti-bot block page detection
//!
//! Classifies a response body as normal content or a block/challenge page by
//! substring match against a small fixed set of known block-page signatures.
//! This is a best-effort heuristic: a miss is possible, but a hit is a
//! strong signal that every further request in the session would also be
//! blocked, so the orchestrator halts the whole run on `Blocked`.

/// Result of classifying a response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Ordinary page content
    Normal,

    /// A block or challenge page
    Blocked,
}

/// Known block-page signatures, matched case-insensitively.
///
/// The target serves challenge pages in French or English depending on the
/// request's locale headers.
const BLOCK_SIGNATURES: [&str; 4] = [
    "unusual traffic",
    "i am not a robot",
    "je ne suis pas un robot",
    "captcha",
];

/// Classifies a response body. Pure; no side effects.
pub fn classify(body: &str) -> Classification {
    let lowered = body.to_lowercase();
    for signature in BLOCK_SIGNATURES {
        if lowered.contains(signature) {
            return Classification::Blocked;
        }
    }
    Classification::Normal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_listing_page() {
        let body = r#"<html><body><div class="blocAnnonce"><h3><a href="/a">T3</a></h3></div></body></html>"#;
        assert_eq!(classify(body), Classification::Normal);
    }

    #[test]
    fn test_empty_body_is_normal() {
        assert_eq!(classify(""), Classification::Normal);
    }

    #[test]
    fn test_unusual_traffic_banner() {
        let body = "<html><body>Our systems have detected unusual traffic from your network.</body></html>";
        assert_eq!(classify(body), Classification::Blocked);
    }

    #[test]
    fn test_robot_prompt() {
        let body = "<p>Please confirm: I am not a robot</p>";
        assert_eq!(classify(body), Classification::Blocked);
    }

    #[test]
    fn test_french_robot_prompt() {
        let body = "<p>Veuillez cocher la case « Je ne suis pas un robot »</p>";
        assert_eq!(classify(body), Classification::Blocked);
    }

    #[test]
    fn test_captcha_challenge() {
        let body = "<div id='captcha-box'>Complete the CAPTCHA to continue</div>";
        assert_eq!(classify(body), Classification::Blocked);
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let body = "UNUSUAL TRAFFIC detected";
        assert_eq!(classify(body), Classification::Blocked);
    }

    #[test]
    fn test_listing_mentioning_robots_is_normal() {
        // An ordinary listing describing e.g. a robot vacuum must not trip
        // the detector; signatures are full block-page phrases.
        let body = "<p>Appartement moderne avec aspirateur robot inclus</p>";
        assert_eq!(classify(body), Classification::Normal);
    }
}
