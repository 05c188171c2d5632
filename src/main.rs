//! `realm-provisioner` binary.

fn main() -> std::process::ExitCode {
	realm_provisioner::cli::run()
}
