//! Voice Commands

/// 创建音色命令（上传已解码的字节与文件名）
#[derive(Debug, Clone)]
pub struct CreateVoice {
    pub name: String,
    pub description: Option<String>,
    pub audio_data: Vec<u8>,
    pub audio_filename: Option<String>,
}

/// 删除音色命令
#[derive(Debug, Clone)]
pub struct DeleteVoice {
    pub voice_id: String,
}
