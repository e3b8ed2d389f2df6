#[test]
fn hill() {
    trycmd::TestCases::new()
        .case("tests/hill/*.toml")
        .env("REPSTAT_ALLOW_STDIN", "true")
        .default_bin_name("repstat");
}

#[test]
fn lengths() {
    trycmd::TestCases::new()
        .case("tests/lengths/*.toml")
        .env("REPSTAT_ALLOW_STDIN", "true")
        .default_bin_name("repstat");
}

#[test]
fn rarefy() {
    trycmd::TestCases::new()
        .case("tests/rarefy/*.toml")
        .env("REPSTAT_ALLOW_STDIN", "true")
        .default_bin_name("repstat");
}

#[test]
fn stat() {
    trycmd::TestCases::new()
        .case("tests/stat/*.toml")
        .env("REPSTAT_ALLOW_STDIN", "true")
        .default_bin_name("repstat");
}
