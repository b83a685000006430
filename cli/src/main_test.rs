use super::*;

// =============================================================
// argument parsing
// =============================================================

#[test]
fn parses_login_with_defaults() {
    let cli = Cli::try_parse_from(["protein-cli", "login", "a@b.com", "--password", "pw"]).unwrap();
    assert_eq!(cli.state_file, DEFAULT_STATE_FILE);
    assert_eq!(cli.verbose, 0);
    match cli.command {
        Command::Login { email, password } => {
            assert_eq!(email, "a@b.com");
            assert_eq!(password, "pw");
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_review_post_with_repeated_images() {
    let cli = Cli::try_parse_from([
        "protein-cli",
        "-vv",
        "reviews",
        "post",
        "--protein",
        "25g",
        "--price",
        "$1.20",
        "--comment",
        "Solid.",
        "--image",
        "https://img.test/a.jpg",
        "--image",
        "https://img.test/b.jpg",
    ])
    .unwrap();
    assert_eq!(cli.verbose, 2);
    let Command::Reviews(ReviewsCommand { command: ReviewsSubcommand::Post(args) }) = cli.command else {
        panic!("expected reviews post");
    };
    assert_eq!(args.images.len(), 2);
    assert_eq!(args.protein, "25g");
}

#[test]
fn reviews_list_uses_default_page() {
    let cli = Cli::try_parse_from(["protein-cli", "reviews", "list"]).unwrap();
    let Command::Reviews(ReviewsCommand { command: ReviewsSubcommand::List { limit, offset } }) = cli.command else {
        panic!("expected reviews list");
    };
    assert_eq!(limit, api::DEFAULT_PAGE_LIMIT);
    assert_eq!(offset, 0);
}

#[test]
fn login_requires_password() {
    assert!(Cli::try_parse_from(["protein-cli", "login", "a@b.com"]).is_err());
}

// =============================================================
// error rendering
// =============================================================

#[test]
fn invalid_input_lists_every_field() {
    let errors = validation::validate_login("", "").unwrap_err();
    let rendered = CliError::Invalid(errors).to_string();
    assert_eq!(
        rendered,
        format!("invalid input: email: {}; password: {}", validation::EMAIL_REQUIRED, validation::PASSWORD_REQUIRED)
    );
}

#[test]
fn api_errors_render_their_message() {
    let err = CliError::from(ApiError::Status { status: 409, message: "Email already registered".to_owned() });
    assert_eq!(err.to_string(), "request failed with status 409: Email already registered");
}
