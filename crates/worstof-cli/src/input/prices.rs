//! Price table loaders standing in for the market data provider.

use chrono::NaiveDate;
use std::fs::File;
use std::io::Read;

use worstof_core::market::{Basket, Observation, PriceSeries};

use super::{file, stdin};

/// Load a basket from a wide CSV, a JSON file, or JSON piped on stdin, then
/// keep only `underlyings` (in that order) when given.
pub fn load_basket(
    prices: Option<&str>,
    underlyings: Option<&[String]>,
) -> Result<Basket, Box<dyn std::error::Error>> {
    let basket = match prices {
        Some(path) if file::has_extension(path, &["csv"]) => {
            let canonical = file::resolve_path(path)?;
            let reader = File::open(&canonical)
                .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
            parse_wide_csv(reader)
                .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
        }
        Some(path) => file::read_json::<Basket>(path)?,
        None => match stdin::read_basket()? {
            Some(basket) => basket,
            None => {
                return Err("--prices <file.csv|file.json> or a JSON basket on stdin required".into())
            }
        },
    };

    tracing::info!(underlyings = ?basket.names(), "basket loaded");
    match underlyings {
        Some(names) if !names.is_empty() => Ok(basket.select(names)?),
        _ => Ok(basket),
    }
}

/// Parse `date,<name1>,<name2>,...` closing prices. Blank cells mean the
/// underlying has no observation on that date.
pub fn parse_wide_csv<R: Read>(reader: R) -> Result<Basket, Box<dyn std::error::Error>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();
    if headers.len() < 2 {
        return Err("price table needs a date column and at least one underlying column".into());
    }
    let names: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();
    let mut columns: Vec<Vec<Observation>> = vec![Vec::new(); names.len()];

    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        let line = row + 2;
        let raw_date = record.get(0).unwrap_or_default();
        let date = parse_date(raw_date)
            .ok_or_else(|| format!("line {line}: invalid date '{raw_date}'"))?;

        for (col, cell) in record.iter().skip(1).enumerate().take(names.len()) {
            if cell.is_empty() {
                continue;
            }
            let price: f64 = cell.parse().map_err(|_| {
                format!("line {line}: invalid price '{cell}' for {}", names[col])
            })?;
            columns[col].push(Observation { date, price });
        }
    }

    let series = names
        .into_iter()
        .zip(columns)
        .map(|(name, observations)| PriceSeries::new(name, observations))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Basket::new(series)?)
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use worstof_core::WorstOfError;

    const TABLE: &str = "\
Date,GENERALI,TENARIS,TERNA
2024-01-02,20.10,17.50,7.02
2024-01-03,20.25,,7.05
2024-01-04 00:00:00+01:00,20.40,17.10,7.11
";

    #[test]
    fn test_wide_csv_columns_become_series() {
        let basket = parse_wide_csv(TABLE.as_bytes()).unwrap();
        assert_eq!(basket.names(), vec!["GENERALI", "TENARIS", "TERNA"]);
        assert_eq!(basket.get("GENERALI").unwrap().len(), 3);
    }

    #[test]
    fn test_blank_cells_are_skipped() {
        let basket = parse_wide_csv(TABLE.as_bytes()).unwrap();
        let tenaris = basket.get("TENARIS").unwrap();
        assert_eq!(tenaris.len(), 2);
        assert_eq!(tenaris.last().price, 17.10);
        assert_eq!(
            tenaris.last().date,
            NaiveDate::from_ymd_opt(2024, 1, 4).unwrap()
        );
    }

    #[test]
    fn test_empty_column_is_an_error() {
        let table = "Date,A,B\n2024-01-02,1.0,\n2024-01-03,1.1,\n";
        let err = parse_wide_csv(table.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("B"));
    }

    #[test]
    fn test_bad_price_reports_line() {
        let table = "Date,A\n2024-01-02,1.0\n2024-01-03,abc\n";
        let err = parse_wide_csv(table.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_bad_date() {
        let table = "Date,A\n02/01/2024,1.0\n";
        assert!(parse_wide_csv(table.as_bytes()).is_err());
    }

    #[test]
    fn test_select_missing_underlying() {
        let basket = parse_wide_csv(TABLE.as_bytes()).unwrap();
        let err = basket.select(&["GENERALI", "ENEL"]).unwrap_err();
        assert!(matches!(err, WorstOfError::MissingUnderlying(ref n) if n == "ENEL"));
    }
}
