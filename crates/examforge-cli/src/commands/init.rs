//! The `examforge init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("examforge.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("data")?;
    write_if_missing(Path::new("data/outcomes.csv"), SAMPLE_OUTCOMES)?;

    println!("\nNext steps:");
    println!("  1. Set GEMINI_API_KEY, or edit examforge.toml");
    println!("  2. Browse outcomes: examforge catalog --subject Toán");
    println!("  3. Add rows: examforge add-row --subject Toán --topic \"Số thập phân\" --lesson 10 --outcome 1 --type mcq");
    println!("  4. Run: examforge allocate, examforge generate, examforge export");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# examforge configuration

# Without a default provider, questions get placeholder content.
# default_provider = "gemini"
temperature = 0.7
max_output_tokens = 1024
timeout_secs = 90

[providers.gemini]
type = "gemini"
api_key = "${GEMINI_API_KEY}"
model = "gemini-2.0-flash"

[providers.ollama]
type = "ollama"
base_url = "http://localhost:11434"
model = "qwen2.5:7b"

[exam]
title = "ĐỀ KIỂM TRA ĐỊNH KÌ"
grade = 5
time_minutes = 40
language = "Vietnamese"

[allocation]
block1_points = 2.5
block2_points = 7.5

[data]
outcomes = "data/outcomes.csv"
periods = "data/periods.csv"
"#;

const SAMPLE_OUTCOMES: &str = "Môn,Chủ đề/Chủ điểm,Bài,Tên bài học,Yêu cầu cần đạt
Toán,Số thập phân,10,Khái niệm số thập phân,\"Đọc, viết được số thập phân\"
Toán,Số thập phân,10,Khái niệm số thập phân,Nhận biết được phần nguyên và phần thập phân
Toán,Số thập phân,12,So sánh các số thập phân,So sánh được hai số thập phân
Toán,Hình học,25,Hình tam giác,Nhận biết được hình tam giác và các yếu tố của nó
Tiếng Việt,Thế giới tuổi thơ,1,Thanh âm của núi,Đọc hiểu nội dung bài đọc
Khoa học,Chất,1,Thành phần và vai trò của đất,Nêu được thành phần của đất
Khoa học,Chất,3,Hỗn hợp và dung dịch,Phân biệt được hỗn hợp và dung dịch
";
