//! Shared fixtures for unit tests.

use std::io::Write;

use tempfile::NamedTempFile;

use crate::config::DashboardConfig;
use crate::context::DataContext;

/// Header of the public dataset, including the column the loader ignores.
pub const HEADER: &str = "User_ID,Product_ID,Gender,Age,Occupation,City_Category,Stay_In_Current_City_Years,Marital_Status,Product_Category_1,Product_Category_2,Product_Category_3,Purchase";

/// Write a CSV file with [`HEADER`] followed by `rows`.
pub fn write_csv(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file
}

/// Load `rows` into a context with the default configuration.
pub fn context_from_rows(rows: &[&str]) -> DataContext {
    let file = write_csv(rows);
    DataContext::load(&DashboardConfig::default().with_data_path(file.path())).unwrap()
}

/// Three rows: customer 1 (Male) twice, customer 2 (Female) once.
pub fn minimal_context() -> DataContext {
    context_from_rows(&[
        "1,P1,M,26-35,4,A,1,0,1,,,100",
        "1,P2,M,26-35,4,A,1,0,2,,,50",
        "2,P3,F,18-25,7,B,2,1,3,,,200",
    ])
}

/// A dozen rows over five customers, with ties and numeric occupation codes
/// whose lexical and numeric orders differ.
pub fn sample_context() -> DataContext {
    context_from_rows(&[
        "1000001,P00069042,F,0-17,10,A,2,0,3,,,8370",
        "1000001,P00248942,F,0-17,10,A,2,0,1,6,14,15200",
        "1000002,P00087842,M,55+,16,C,4+,0,12,,,1422",
        "1000003,P00085442,M,26-35,15,A,3,0,12,14,,1057",
        "1000003,P00285442,M,26-35,15,A,3,0,8,,,7969",
        "1000004,P00193542,M,46-50,7,B,2,1,1,2,,15227",
        "1000004,P00184942,M,46-50,7,B,2,1,1,8,17,19215",
        "1000004,P00346142,M,46-50,7,B,2,1,1,15,,15854",
        "1000005,P00097242,F,26-35,2,A,1,1,5,,,5254",
        "1000005,P00274942,F,26-35,2,A,1,1,8,,,3957",
        "1000005,P00251242,F,26-35,2,A,1,1,5,11,,6187",
        "1000002,P00014542,M,55+,16,C,4+,0,8,,,7871",
    ])
}
