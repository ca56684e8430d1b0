//! Extraction instruction sent with every card image.

/// Default prompt describing the target JSON schema and where to look.
pub const DEFAULT_PROMPT: &str = r#"Extract ALL details from this business card image.
SCAN EVERY PIXEL: small text (email, website) is often near the very bottom or next to icons (globe, envelope).
Search for any text containing '@' or starting with 'www.' or 'http'.
Search for job titles (e.g. 'CEO', 'Founder', 'Manager').
Ignore non-contact text such as wood or table patterns in the background.

Return ONLY a valid JSON object:
{
    "name": "Full Name",
    "company": "Company Name",
    "title": "Job Title",
    "phone": "Full Phone Number",
    "email": "Email Address",
    "address": "Full Physical Address (from the card)",
    "website": "Full Website URL"
}"#;
