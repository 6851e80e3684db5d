/// SSH flags that consume the following token as their argument
const ARG_FLAGS: [&str; 5] = ["-o", "-p", "-l", "-i", "-W"];

/// Check if a foreground command line is an SSH client.
///
/// Recognizes `ssh`, any path ending in `/ssh`, and `kitten ssh`.
pub fn is_ssh_command(cmdline: &[String]) -> bool {
    let Some(cmd) = cmdline.first() else {
        return false;
    };

    cmd == "ssh" || cmd.ends_with("/ssh") || is_kitten_ssh(cmdline)
}

/// Extract the destination host from an SSH command line.
///
/// Handles the common shapes:
/// - `ssh hostname`
/// - `/usr/bin/ssh hostname`
/// - `ssh -o Option=value -p 22 hostname`
/// - `ssh -- hostname`
/// - `kitten ssh hostname`
pub fn extract_hostname(cmdline: &[String]) -> Option<String> {
    if cmdline.is_empty() {
        return None;
    }

    let start = if is_kitten_ssh(cmdline) { 2 } else { 1 };
    let mut args = cmdline.iter().skip(start);

    while let Some(arg) = args.next() {
        // End of options: whatever follows is the host, even if it looks like a flag
        if arg == "--" {
            return args.next().filter(|host| !host.is_empty()).cloned();
        }

        if ARG_FLAGS.contains(&arg.as_str()) {
            args.next();
            continue;
        }

        if arg.starts_with('-') || arg.contains('=') || arg == "ssh" {
            continue;
        }

        return Some(arg.clone());
    }

    None
}

fn is_kitten_ssh(cmdline: &[String]) -> bool {
    matches!(cmdline, [first, second, ..] if first == "kitten" && second == "ssh")
}
