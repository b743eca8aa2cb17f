use std::path::Path;

/// 取文件名中最后一个 `.` 之后的部分作为扩展名
///
/// 没有 `.` 的文件名整体作为扩展名（如 `Makefile` 得到 `Makefile`），
/// 隐藏文件 `.gitignore` 得到 `gitignore`，以点结尾的文件名得到空字符串。
pub fn extension_of_name(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(index) => &file_name[index + 1..],
        None => file_name,
    }
}

/// 从路径的文件名部分推导扩展名，非 UTF-8 文件名按有损方式转换
pub fn extension_of(path: &Path) -> String {
    let file_name = match path.file_name() {
        Some(name) => name.to_string_lossy(),
        None => return String::new(),
    };

    extension_of_name(&file_name).to_string()
}
