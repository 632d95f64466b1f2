//! Server-rendered HTML pages.

use std::fmt::Write as _;

use chrono::NaiveDate;

use farmacia_inventory::{InventoryItem, format_expiry};

/// Escape text for HTML element and attribute content.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<nav>
<a href="/">Inicio</a> |
<a href="/antibiotico">Antibióticos</a> |
<a href="/antibiotico/nuevo">Nuevo antibiótico</a>
</nav>
<h1>{title}</h1>
{body}
</body>
</html>
"#,
        title = escape(title),
    )
}

fn search_form(fragment: &str) -> String {
    format!(
        r#"<form method="get" action="/antibioticos/buscar">
<input type="text" name="nombre" value="{}" placeholder="Nombre comercial">
<button type="submit">Buscar</button>
</form>
"#,
        escape(fragment)
    )
}

fn item_table(items: &[InventoryItem]) -> String {
    if items.is_empty() {
        return "<p>No hay antibióticos registrados.</p>\n".to_string();
    }

    let mut html = String::from(
        "<table>\n<thead><tr>\
         <th>Código</th><th>Nombre comercial</th><th>Nombre genérico</th>\
         <th>Laboratorio</th><th>Vencimiento</th><th>Lote</th><th>Presentación</th>\
         <th>Precio</th><th>Stock</th><th>Vía de administración</th><th>Tipo</th>\
         </tr></thead>\n<tbody>\n",
    );
    for item in items {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td>{}</td><td>{:.2}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(item.code().as_str()),
            escape(item.commercial_name()),
            escape(item.generic_name()),
            escape(item.manufacturer()),
            format_expiry(item.expiry()),
            escape(item.batch()),
            escape(item.dosage_form()),
            item.price(),
            item.stock(),
            escape(item.route()),
            escape(item.kind().label()),
        );
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

/// Full table of items, with the search box.
pub fn item_list(title: &str, items: &[InventoryItem], fragment: &str) -> String {
    let mut body = search_form(fragment);
    body.push_str(&item_table(items));
    layout(title, &body)
}

pub struct DashboardView<'a> {
    pub today: NaiveDate,
    pub low_stock_threshold: i64,
    pub expiry_window_days: i64,
    pub low_stock: &'a [InventoryItem],
    pub expiring_soon: &'a [InventoryItem],
    pub expired: &'a [InventoryItem],
}

fn alert_list(items: &[InventoryItem], line: impl Fn(&InventoryItem) -> String) -> String {
    if items.is_empty() {
        return "<p>Sin alertas.</p>\n".to_string();
    }
    let mut html = String::from("<ul>\n");
    for item in items {
        let _ = writeln!(html, "<li>{}</li>", line(item));
    }
    html.push_str("</ul>\n");
    html
}

pub fn dashboard(view: &DashboardView<'_>) -> String {
    let mut body = String::new();

    let _ = writeln!(
        body,
        "<h2>Stock bajo (menos de {} unidades)</h2>",
        view.low_stock_threshold
    );
    body.push_str(&alert_list(view.low_stock, |i| {
        format!(
            "{} ({}): {} unidades",
            escape(i.commercial_name()),
            escape(i.code().as_str()),
            i.stock()
        )
    }));

    let _ = writeln!(
        body,
        "<h2>Próximos a vencer (en {} días)</h2>",
        view.expiry_window_days
    );
    body.push_str(&alert_list(view.expiring_soon, |i| {
        format!(
            "{} ({}): vence el {} (faltan {} días)",
            escape(i.commercial_name()),
            escape(i.code().as_str()),
            format_expiry(i.expiry()),
            i.days_until_expiry(view.today)
        )
    }));

    body.push_str("<h2>Vencidos</h2>\n");
    body.push_str(&alert_list(view.expired, |i| {
        format!(
            "{} ({}): venció el {}",
            escape(i.commercial_name()),
            escape(i.code().as_str()),
            format_expiry(i.expiry())
        )
    }));

    layout("Panel de inventario", &body)
}

pub fn new_item_form() -> String {
    let fields = [
        ("codigo", "Código", "text"),
        ("nombre_comercial", "Nombre comercial", "text"),
        ("nombre_generico", "Nombre genérico", "text"),
        ("laboratorio", "Laboratorio", "text"),
        ("vencimiento", "Vencimiento", "date"),
        ("lote", "Lote", "text"),
        ("presentacion", "Presentación", "text"),
        ("precio", "Precio", "number"),
        ("stock", "Stock", "number"),
        ("via_administracion", "Vía de administración", "text"),
    ];

    let mut body = String::from(r#"<form method="post" action="/antibiotico/nuevo">"#);
    body.push('\n');
    for (name, label, kind) in fields {
        let step = match name {
            "precio" => r#" step="0.01" min="0""#,
            "stock" => r#" step="1" min="0""#,
            _ => "",
        };
        let _ = writeln!(
            body,
            r#"<p><label for="{name}">{label}</label> <input id="{name}" name="{name}" type="{kind}"{step} required></p>"#
        );
    }
    body.push_str("<button type=\"submit\">Guardar</button>\n</form>\n");

    layout("Nuevo antibiótico", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(
            escape(r#"<b a="x">&'"#),
            "&lt;b a=&quot;x&quot;&gt;&amp;&#39;"
        );
        assert_eq!(escape("Cápsulas 500mg"), "Cápsulas 500mg");
    }

    #[test]
    fn empty_list_renders_placeholder() {
        let html = item_list("Antibióticos", &[], "<x>");
        assert!(html.contains("No hay antibióticos registrados."));
        assert!(html.contains("value=\"&lt;x&gt;\""));
    }

    #[test]
    fn intake_form_posts_every_field() {
        let html = new_item_form();
        for field in [
            "codigo",
            "nombre_comercial",
            "nombre_generico",
            "laboratorio",
            "vencimiento",
            "lote",
            "presentacion",
            "precio",
            "stock",
            "via_administracion",
        ] {
            assert!(html.contains(&format!("name=\"{field}\"")), "missing {field}");
        }
    }
}
