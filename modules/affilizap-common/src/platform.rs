use crate::types::Platform;

/// Hostname fragments per marketplace, checked in order; first match wins.
const FRAGMENTS: &[(&str, Platform)] = &[
    ("amazon", Platform::Amazon),
    ("amzn", Platform::Amazon),
    ("shopee", Platform::Shopee),
    ("shp.ee", Platform::Shopee),
    ("shope.ee", Platform::Shopee),
    ("mercadolivre", Platform::MercadoLivre),
    ("mercadolibre", Platform::MercadoLivre),
    ("meli.la", Platform::MercadoLivre),
    ("magalu", Platform::Magalu),
    ("magazinevoce", Platform::Magalu),
    ("magazineluiza", Platform::Magalu),
    ("aliexpress", Platform::Aliexpress),
];

/// Classify a product link by marketplace. Case-insensitive substring match;
/// anything unmatched is `Platform::Other`.
pub fn classify(link: &str) -> Platform {
    let lower = link.to_lowercase();
    FRAGMENTS
        .iter()
        .find(|(fragment, _)| lower.contains(fragment))
        .map(|(_, platform)| *platform)
        .unwrap_or(Platform::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[(&str, Platform)] = &[
        ("https://amzn.to/abc123", Platform::Amazon),
        ("https://www.amazon.com.br/dp/B0C1234567", Platform::Amazon),
        ("HTTPS://WWW.AMAZON.COM.BR/DP/B0C", Platform::Amazon),
        ("https://shopee.com.br/product/1/2", Platform::Shopee),
        ("https://shp.ee/xyz", Platform::Shopee),
        ("https://shope.ee/7ABCdef", Platform::Shopee),
        ("https://mercadolivre.com/sec/1a2b3c", Platform::MercadoLivre),
        ("https://produto.mercadolibre.com.ar/MLA-1", Platform::MercadoLivre),
        ("https://meli.la/2xYz", Platform::MercadoLivre),
        ("https://www.magazinevoce.com.br/loja/p/123", Platform::Magalu),
        ("https://www.magazineluiza.com.br/x/p/1", Platform::Magalu),
        ("https://magalu.com/abc", Platform::Magalu),
        ("https://pt.aliexpress.com/item/1005.html", Platform::Aliexpress),
        ("https://www.kabum.com.br/produto/1", Platform::Other),
        ("", Platform::Other),
        ("Link na imagem", Platform::Other),
    ];

    #[test]
    fn test_classify_known_links() {
        for (link, expected) in SAMPLES {
            assert_eq!(classify(link), *expected, "link: {link}");
        }
    }

    #[test]
    fn test_first_fragment_wins() {
        // An Amazon redirect that mentions Shopee in the query string.
        assert_eq!(
            classify("https://amzn.to/x?ref=shopee"),
            Platform::Amazon
        );
    }

    #[test]
    fn test_classify_is_deterministic_and_total() {
        let mut inputs: Vec<String> = SAMPLES.iter().map(|(l, _)| l.to_string()).collect();
        inputs.extend([
            "   ".to_string(),
            "🔥🔥🔥".to_string(),
            "ftp://AliExpress".to_string(),
            "x".repeat(10_000),
            "\u{0}\u{1}".to_string(),
            "mercado livre".to_string(),
        ]);

        for input in &inputs {
            let first = classify(input);
            assert_eq!(first, classify(input), "input: {input:?}");
            assert!(Platform::ALL.contains(&first));
        }
    }
}
