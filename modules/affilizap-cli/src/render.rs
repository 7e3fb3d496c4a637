use affilizap_common::GeneratedCopy;

/// Human-readable listing of entries.
pub fn print_copies(copies: &[GeneratedCopy]) {
    for (i, copy) in copies.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}", header(i + 1, copy));
        if !copy.original_link.is_empty() {
            println!("{}", copy.original_link);
        }
        if let Some(url) = &copy.product_image_url {
            println!("Imagem: {url}");
        }
        println!();
        println!("{}", copy.text);
    }
}

pub fn print_json(copies: &[GeneratedCopy]) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(copies)?);
    Ok(())
}

fn header(position: usize, copy: &GeneratedCopy) -> String {
    let status = if copy.is_error { " [ERRO]" } else { "" };
    let when = copy.display_timestamp();
    format!(
        "=== #{position} {} | {} | {} | {}{status} ===",
        copy.platform.label(),
        copy.category,
        when,
        copy.id
    )
}
