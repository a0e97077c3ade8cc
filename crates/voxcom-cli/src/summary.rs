use console::Style;

struct Styles {
    label: Style,
    value: Style,
    ok: Style,
    warn: Style,
    fail: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            ok: Style::new().green(),
            warn: Style::new().yellow(),
            fail: Style::new().red().bold(),
            path: Style::new().underlined(),
        }
    }
}

/// Print one full log row (path, id, x, y, z, distance, warning flags).
pub fn print_row(row: &[String]) {
    if row.len() != 7 {
        return;
    }
    let id = if row[1] == "na" { None } else { Some(row[1].as_str()) };
    let fields: [String; 5] = [
        row[2].clone(),
        row[3].clone(),
        row[4].clone(),
        row[5].clone(),
        row[6].clone(),
    ];
    print_outcome(&row[0], id, &fields);
}

/// Print a styled check summary for one volume.
///
/// `fields` are the x, y, z, distance and warning-flags column values.
pub fn print_outcome(path: &str, id: Option<&str>, fields: &[String; 5]) {
    let s = Styles::new();

    println!();
    println!("  {:<12}{}", s.label.apply_to("File"), s.path.apply_to(path));
    if let Some(id) = id {
        println!("  {:<12}{}", s.label.apply_to("Subject"), s.value.apply_to(id));
    }
    println!(
        "  {:<12}({}, {}, {})",
        s.label.apply_to("Center"),
        s.value.apply_to(&fields[0]),
        s.value.apply_to(&fields[1]),
        s.value.apply_to(&fields[2])
    );
    println!(
        "  {:<12}{}",
        s.label.apply_to("Distance"),
        s.value.apply_to(&fields[3])
    );

    let flag = fields[4].as_str();
    let status = if flag.is_empty() {
        s.ok.apply_to("centered".to_string())
    } else if flag == "FAILED" {
        s.fail.apply_to(flag.to_string())
    } else {
        s.warn.apply_to(flag.to_string())
    };
    println!("  {:<12}{}", s.label.apply_to("Status"), status);
    println!();
}
