// ABOUTME: Shell-script stand-ins for sqlplus.
// ABOUTME: Each writes an executable into a temp dir that mimics part of a real session.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Password the well-behaved fake accepts.
pub const PASSWORD: &str = "tiger";

/// Prints the login banner and prompts, answers each statement, exits 0 on EOF.
///
/// Statements mentioning `missing_table` produce an ORA error, `bogus` an SP2 error.
pub const SQLPLUS: &str = r#"#!/bin/sh
echo "SQL*Plus: Release 19.0.0.0.0 - Production"
echo "args: $*"
echo
printf 'Enter password: '
IFS= read -r password || exit 3
echo
if [ "$password" != "tiger" ]; then
  echo "ORA-01017: invalid username/password; logon denied"
  exit 1
fi
echo "Connected to: Oracle Database 19c"
echo
printf 'SQL> '
while IFS= read -r line; do
  echo
  case "$line" in
    *missing_table*) echo "ORA-00942: table or view does not exist" ;;
    *bogus*) echo "SP2-0734: unknown command beginning \"bogus\"" ;;
    *) echo "ok: $line" ;;
  esac
  printf 'SQL> '
done
echo
echo "Disconnected from Oracle Database 19c"
exit 0
"#;

/// Logs in normally, then exits with status 7 once the script arrives.
pub const FAILING_EXIT: &str = r#"#!/bin/sh
printf 'Enter password: '
read -r password
echo
printf 'SQL> '
read -r line
echo "giving up"
exit 7
"#;

/// Logs in normally, then ignores its input and never exits on its own.
pub const HANGING: &str = r#"#!/bin/sh
printf 'Enter password: '
read -r password
echo
printf 'SQL> '
exec sleep 30
"#;

/// Reports an SP2 error on stderr, after its stdout line is complete, then exits 0.
pub const STDERR_ERROR: &str = r#"#!/bin/sh
printf 'Enter password: '
read -r password
echo
printf 'SQL> '
read -r line
echo
sleep 0.2
echo 'SP2-0310: unable to open file "missing.sql"' >&2
exit 0
"#;

/// Uses non-sqlplus prompts and swallows its input until EOF.
pub const CUSTOM_PROMPTS: &str = r#"#!/bin/sh
printf 'Password for scott: '
read -r password
echo
printf 'db> '
cat > /dev/null
exit 0
"#;

/// Exits before printing any prompt.
pub const CRASHING: &str = r#"#!/bin/sh
echo "error while loading shared libraries: libclntsh.so.19.1" >&2
exit 127
"#;

/// Never prompts for a password; records whatever arrives on stdin to `path`.
pub fn silent_recorder(path: &Path) -> String {
    format!(
        "#!/bin/sh\necho 'connecting...'\nexec cat > '{}'\n",
        path.display()
    )
}

/// Write `script` as an executable named `sqlplus` in `dir`.
pub fn install(dir: &TempDir, script: &str) -> PathBuf {
    let path = dir.path().join("sqlplus");
    fs::write(&path, script).unwrap();

    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();

    path
}
