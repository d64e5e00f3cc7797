use kitchen_protocol::RegenerationStyle;

/// Infer retrieval tags from the prompt plus any regional style hint.
/// Always yields at least one tag; "comfort" is the default mood.
pub fn infer_tags(
    prompt: &str,
    regional_style: Option<&str>,
    regeneration: Option<RegenerationStyle>,
) -> Vec<String> {
    let text = format!("{} {}", prompt, regional_style.unwrap_or("")).to_lowercase();
    let mut tags: Vec<&str> = Vec::new();
    let mut push = |tag: &'static str, tags: &mut Vec<&str>| {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    };

    if text.contains("quick") || text.contains("30") || text.contains("weeknight") {
        push("weeknight", &mut tags);
    }
    if text.contains("comfort") || text.contains("sunday") || text.contains("nostalg") {
        push("comfort", &mut tags);
    }
    if text.contains("sunday") {
        push("sunday", &mut tags);
    }
    if text.contains("kid") {
        push("kid-friendly", &mut tags);
    }
    if text.contains("mild") {
        push("mild", &mut tags);
    }
    if text.contains("fish") || text.contains("seafood") {
        push("seafood", &mut tags);
    }
    if text.contains("sicilian") {
        push("sicilian", &mut tags);
    }
    if text.contains("neapolitan") || text.contains("naples") {
        push("neapolitan", &mut tags);
    }
    if text.contains("italian-american") || text.contains("new york") {
        push("italian-american", &mut tags);
    }
    if text.contains("oaxacan") {
        push("oaxacan", &mut tags);
    }
    if text.contains("valencian") || text.contains("valencia") {
        push("valencian", &mut tags);
    }
    if text.contains("russian")
        || text.contains("babushka")
        || text.contains("pelmeni")
        || text.contains("borscht")
    {
        push("russian", &mut tags);
    }
    if text.contains("puerto rican") || text.contains("boricua") || text.contains("asopao") {
        push("puerto-rican", &mut tags);
    }
    if text.contains("dominican") || text.contains("sancocho") || text.contains("la bandera") {
        push("dominican", &mut tags);
    }
    if text.contains("korean")
        || text.contains("kimchi")
        || text.contains("jjigae")
        || text.contains("halmeoni")
    {
        push("korean", &mut tags);
    }
    if text.contains("filipino")
        || text.contains("adobo")
        || text.contains("sinigang")
        || text.contains("lola")
    {
        push("filipino", &mut tags);
    }
    if text.contains("jewish")
        || text.contains("bubbe")
        || text.contains("brisket")
        || text.contains("kugel")
    {
        push("jewish", &mut tags);
    }
    if text.contains("west african")
        || text.contains("jollof")
        || text.contains("egusi")
        || text.contains("groundnut")
    {
        push("west-african", &mut tags);
    }

    match regeneration {
        Some(RegenerationStyle::Faster) => push("weeknight", &mut tags),
        Some(RegenerationStyle::Traditional) => push("sunday", &mut tags),
        _ => {}
    }

    if tags.is_empty() {
        tags.push("comfort");
    }

    tags.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn quick_prompts_tag_weeknight() {
        let tags = infer_tags("need a 30-minute dinner", None, None);
        assert_eq!(tags, vec!["weeknight".to_string()]);
    }

    #[test]
    fn sunday_tags_both_comfort_and_sunday() {
        let tags = infer_tags("sunday dinner please", None, None);
        assert_eq!(tags, vec!["comfort".to_string(), "sunday".to_string()]);
    }

    #[test]
    fn regional_style_contributes_tags() {
        let tags = infer_tags("family pasta", Some("Sicilian"), None);
        assert!(tags.contains(&"sicilian".to_string()));
    }

    #[test]
    fn regeneration_faster_adds_weeknight() {
        let tags = infer_tags("family stew", None, Some(RegenerationStyle::Faster));
        assert!(tags.contains(&"weeknight".to_string()));
    }

    #[test]
    fn dish_words_tag_their_cuisine() {
        let tags = infer_tags("kimchi jjigae weeknight dinner with rice", None, None);
        assert!(tags.contains(&"weeknight".to_string()));
        assert!(tags.contains(&"korean".to_string()));

        let tags = infer_tags("sancocho for a rainy day", None, None);
        assert_eq!(tags, vec!["dominican".to_string()]);

        let tags = infer_tags("jollof for the family pot", None, None);
        assert_eq!(tags, vec!["west-african".to_string()]);
    }

    #[test]
    fn default_is_comfort() {
        assert_eq!(infer_tags("dinner", None, None), vec!["comfort".to_string()]);
    }
}
