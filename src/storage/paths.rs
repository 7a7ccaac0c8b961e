// src/storage/paths.rs

use uuid::Uuid;

// Segmentos de caminho viram [A-Za-z0-9._-]; o resto troca por '_'.
fn sanitize_segment(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    cleaned.trim_start_matches('.').to_string()
}

pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned = sanitize_segment(base);
    if cleaned.is_empty() {
        "arquivo".to_string()
    } else {
        cleaned
    }
}

/// `profile_images/<clientId>-<timestamp>-<filename>`
pub fn profile_image_path(client_id: Uuid, timestamp_millis: i64, filename: &str) -> String {
    format!(
        "profile_images/{}-{}-{}",
        client_id,
        timestamp_millis,
        sanitize_filename(filename)
    )
}

/// `vehicle_images/<vin-or-id>-<filename>`
pub fn vehicle_image_path(vin: &str, vehicle_id: Uuid, filename: &str) -> String {
    let vin = sanitize_segment(vin.trim());
    let key = if vin.is_empty() {
        vehicle_id.to_string()
    } else {
        vin
    };
    format!("vehicle_images/{}-{}", key, sanitize_filename(filename))
}

/// `invoice_pdfs/<vehicleId>/<invoiceNumber-or-timestamp>-<filename>`
pub fn invoice_pdf_path(
    vehicle_id: Uuid,
    invoice_number: &str,
    timestamp_millis: i64,
    filename: &str,
) -> String {
    let number = sanitize_segment(invoice_number.trim());
    let key = if number.is_empty() {
        timestamp_millis.to_string()
    } else {
        number
    };
    format!("invoice_pdfs/{}/{}-{}", vehicle_id, key, sanitize_filename(filename))
}

pub fn content_type_for(path: &str) -> &'static str {
    let ext = path.rsplit('.').next().unwrap_or_default().to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_the_three_layouts() {
        let id = Uuid::nil();
        assert_eq!(
            profile_image_path(id, 1700000000000, "eu.png"),
            format!("profile_images/{}-1700000000000-eu.png", id)
        );
        assert_eq!(
            vehicle_image_path("VSSZZZ6JZ9R123456", id, "frente.jpg"),
            "vehicle_images/VSSZZZ6JZ9R123456-frente.jpg"
        );
        assert_eq!(
            vehicle_image_path("", id, "frente.jpg"),
            format!("vehicle_images/{}-frente.jpg", id)
        );
        assert_eq!(
            invoice_pdf_path(id, "F-2024/001", 42, "fatura.pdf"),
            format!("invoice_pdfs/{}/F-2024_001-fatura.pdf", id)
        );
        assert_eq!(
            invoice_pdf_path(id, "  ", 42, "fatura.pdf"),
            format!("invoice_pdfs/{}/42-fatura.pdf", id)
        );
    }

    #[test]
    fn filenames_cannot_escape_their_folder() {
        assert_eq!(sanitize_filename("../../segredo.txt"), "segredo.txt");
        assert_eq!(sanitize_filename("minha foto (1).jpg"), "minha_foto__1_.jpg");
        assert_eq!(sanitize_filename(".."), "arquivo");
    }

    #[test]
    fn content_types_by_extension() {
        assert_eq!(content_type_for("a/b/c.PDF"), "application/pdf");
        assert_eq!(content_type_for("x.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("sem_extensao"), "application/octet-stream");
    }
}
