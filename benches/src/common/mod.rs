use catalog::prelude::*;

/// Generate a product source with `num_records` lines
///
/// Ids and names are scrambled so every sort does real work. Every
/// `invalid_every`-th line is malformed (0 disables).
pub fn generate_source(num_records: usize, invalid_every: usize) -> String {
    let mut source = String::with_capacity(num_records * 24);

    for i in 0..num_records {
        if invalid_every > 0 && i % invalid_every == invalid_every - 1 {
            source.push_str("not,a,price\n");
            continue;
        }
        let id = (i * 7919) % (num_records + 1);
        let name = format!("Product{:05}", (i * 104_729) % 50_000);
        let price = format!("{}.{:02}", (i * 31) % 1000, i % 100);
        source.push_str(&format!("{id},{name},{price}\n"));
    }

    source
}

/// Parse a generated source into records, dropping malformed lines
pub fn generate_records(num_records: usize) -> Vec<Record> {
    generate_source(num_records, 0)
        .lines()
        .filter_map(|line| parse_line(line).ok())
        .collect()
}
