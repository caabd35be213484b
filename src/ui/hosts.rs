use fsync::HostEntry;

const HEADER: [&str; 5] = ["HOST", "DESTINATION", "PORT", "LOCAL", "REMOTE"];

/// Aligned table of configured hosts, one line per host
pub fn render_host_table(entries: &[HostEntry]) -> String {
    let rows: Vec<[String; 5]> = entries
        .iter()
        .map(|host| {
            [
                host.pet_name().to_string(),
                host.destination(),
                host.port().to_string(),
                host.local_dir().display().to_string(),
                match host.remote_dir() {
                    "" => "~".to_string(),
                    dir => dir.to_string(),
                },
            ]
        })
        .collect();

    let mut widths = HEADER.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header = HEADER.map(str::to_string);
    for row in std::iter::once(&header).chain(&rows) {
        let mut line = String::new();
        for (i, cell) in row.iter().enumerate() {
            if i > 0 {
                line.push_str("  ");
            }
            line.push_str(cell);
            if i + 1 < row.len() {
                let pad = widths[i] - cell.chars().count();
                line.extend(std::iter::repeat(' ').take(pad));
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
