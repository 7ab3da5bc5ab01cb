//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`recover` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用位平面编解码核心以及向用户报告结果。

use crate::cli::{CapacityArgs, HideArgs, RecoverArgs};
use crate::constants::{HIDDEN_IMAGE_PREFIX, RECOVERED_TEXT_PREFIX};
use crate::error::StegoError;
use crate::steganography::{BitPlaneWriter, capacity_of, hide, recover};
use anyhow::{Context, Result};
use colored::Colorize;
use image::RgbImage;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// 读取图像并转换为 8 位 RGB 像素网格，Alpha 通道会被丢弃。
fn load_rgb_image(path: &Path) -> Result<RgbImage> {
    let image = image::open(path).with_context(|| {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;

    if image.color().has_alpha() {
        warn!(
            "{} has an alpha channel, it will be dropped",
            path.to_string_lossy()
        );
    }

    Ok(image.to_rgb8())
}

/// 在输入文件所在目录生成 `<前缀><文件名主干>.<扩展名>` 形式的默认输出路径。
fn default_output_path(input: &Path, prefix: &str, extension: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("{prefix}{stem}.{extension}"))
}

/// 未指定 `--force` 时拒绝覆盖已存在的文件。
fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取图像和载荷文件、检查隐写空间是否足够、调用 [`hide`] 嵌入载荷，
/// 最后将结果写入目标图像文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径、位选择与终止标记的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 位选择或终止标记无效。
/// * 无法读取输入的图像或载荷文件。
/// * 目标文件已存在且未指定 `--force`。
/// * 图像没有足够的空间来隐藏载荷。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let selection = args
        .selection
        .to_selection()
        .context("Invalid bit selection")?;
    let termination = args
        .termination
        .to_termination()
        .context("Invalid termination settings")?;

    let dest = args
        .dest
        .unwrap_or_else(|| default_output_path(&args.image, HIDDEN_IMAGE_PREFIX, "png"));
    ensure_writable(&dest, args.force)?;

    let picture = load_rgb_image(&args.image)?;

    let payload = fs::read(&args.text).with_context(|| {
        format!(
            "Unable to read text file: {}",
            args.text.to_string_lossy().red().bold()
        )
    })?;

    let required_space = BitPlaneWriter::new(&selection, &termination).required_bits(payload.len());
    let available_space = capacity_of(&picture, &selection);
    debug!(
        "selection {:?} gives {} bits per pixel",
        selection,
        selection.bits_per_pixel()
    );

    anyhow::ensure!(
        available_space >= required_space,
        "Not enough space in the image to hide the text. \nRequired: {} bits, Available: {} bits",
        required_space.to_string().red().bold(),
        available_space.to_string().green().bold()
    );

    info!(
        "hiding {} bytes in {}x{} image {}",
        payload.len(),
        picture.width(),
        picture.height(),
        args.image.to_string_lossy()
    );

    let doctored = hide(&picture, &payload, &selection, &termination)
        .context("Failed to hide the payload in the image.")?;

    doctored.save(&dest).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、调用 [`recover`] 还原载荷，
/// 最后将恢复的内容写入目标文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径、位选择与终止标记的 `RecoverArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 位选择或终止标记无效。
/// * 无法读取输入的图像文件。
/// * 图像中找不到终止标记 (通常意味着位选择或标记与隐藏时不一致)。
/// * 目标文件已存在且未指定 `--force`，或无法写入。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let selection = args
        .selection
        .to_selection()
        .context("Invalid bit selection")?;
    let termination = args
        .termination
        .to_termination()
        .context("Invalid termination settings")?;

    let text_path = args
        .text
        .unwrap_or_else(|| default_output_path(&args.image, RECOVERED_TEXT_PREFIX, "txt"));
    ensure_writable(&text_path, args.force)?;

    let picture = load_rgb_image(&args.image)?;

    let payload = recover(&picture, &selection, &termination).map_err(|err| {
        let message = match err {
            StegoError::MarkerNotFound => format!(
                "No hidden message found in '{}'. \nThe bit selection or secret key may not match the ones used for hiding.",
                args.image.to_string_lossy().red().bold()
            ),
            _ => format!(
                "Failed to recover the hidden message from '{}'. \nThe image may be corrupted.",
                args.image.to_string_lossy().red().bold()
            ),
        };
        anyhow::Error::new(err).context(message)
    })?;

    info!(
        "recovered {} bytes from {}",
        payload.len(),
        args.image.to_string_lossy()
    );

    fs::write(&text_path, payload).with_context(|| {
        format!(
            "Unable to write to target text file: {}",
            text_path.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully recovered and saved: {}",
        text_path.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Capacity' 命令的执行逻辑。
///
/// 打印图像在给定位选择下的可寻址位数，并返回扣除终止开销后最多可隐藏的字节数。
pub fn handle_capacity(args: CapacityArgs) -> Result<usize> {
    let selection = args
        .selection
        .to_selection()
        .context("Invalid bit selection")?;
    let termination = args
        .termination
        .to_termination()
        .context("Invalid termination settings")?;

    let picture = load_rgb_image(&args.image)?;
    let bits = capacity_of(&picture, &selection);
    let payload_bytes = bits.saturating_sub(termination.overhead_bits()) / 8;

    println!(
        "{}x{} pixels, {} bits per pixel: {} bits addressable, up to {} payload bytes",
        picture.width(),
        picture.height(),
        selection.bits_per_pixel(),
        bits.to_string().green().bold(),
        payload_bytes.to_string().green().bold()
    );

    Ok(payload_bytes)
}
