use pattybot_core::menu::{Menu, MenuCategory};

pub fn run() -> String {
    render(&Menu::standard())
}

fn render(menu: &Menu) -> String {
    let mut lines = Vec::new();

    for category in MenuCategory::ALL {
        let items = menu.by_category(category);
        if items.is_empty() {
            continue;
        }

        lines.push(format!("{}", category.display_name()));
        for item in items {
            let mut line = format!("  {:<18} ${:>5}  {}", item.name, item.unit_price, item.description);
            if !item.available {
                line.push_str("  (sold out)");
            }
            lines.push(line);
            if !item.options.is_empty() {
                lines.push(format!("  {:<18} options: {}", "", item.options.join(", ")));
            }
        }
        lines.push(String::new());
    }

    lines.join("\n").trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use pattybot_core::menu::Menu;

    use super::render;

    #[test]
    fn render_groups_by_category_and_shows_prices() {
        let output = render(&Menu::standard());
        assert!(output.contains("Burgers"));
        assert!(output.contains("Desserts"));
        assert!(output.contains("Classic Burger"));
        assert!(output.contains("$ 5.90"));
        assert!(output.contains("options: extra cheese, extra bacon, extra patty"));
    }
}
