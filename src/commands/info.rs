/// The help page shown by `info`, `help`, and a bare `kjspkg`.
pub fn info_text() -> String {
    format!(
        "\
kjspkg {version}

Commands:

kjspkg install [pkgname1] [pkgname2] [--quiet/--skip-missing] - installs packages
kjspkg remove/uninstall [pkgname1] [pkgname2] [--quiet/--skip-missing] - removes packages
kjspkg list [--count] - lists packages (or outputs the count of them)

kjspkg init [--override/--quiet] [--version \"<version>\"] [--modloader \"<modloader>\"] - inits a new project (will be run by default)
kjspkg uninit [--confirm] - removes all packages and the project

kjspkg help/info - shows this message

Options:

--root <path> (KJSPKG_ROOT) - project directory, defaults to the current one
--registry-url <url> (KJSPKG_REGISTRY_URL) - where package descriptors are looked up
--git-host <url> (KJSPKG_GIT_HOST) - where package repositories are cloned from
",
        version = env!("KJSPKG_VERSION")
    )
}

pub fn info() {
    println!("{}", info_text());
}
